//! Command-line interface.
//!
//! Every option may also come from the TOML file named by `--config`;
//! values given on the command line take precedence.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::common::ConfigError;
use crate::config::{parse_number, validate_input_path, Config, OwnershipMode};

/// Command-line arguments for the memory controller simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "Protected Memory Controller Simulator")]
pub struct Args {
    /// Maximum number of cycles to simulate [default: 100000]
    #[arg(long, value_parser = parse_number::<u64>)]
    pub cycles: Option<u64>,

    /// Write a JSON Lines cycle trace to this file
    #[arg(long = "tf", visible_alias = "tracefile")]
    pub tracefile: Option<PathBuf>,

    /// ROM latency in cycles [default: 1]
    #[arg(long, value_parser = parse_number::<u64>)]
    pub latency_rom: Option<u64>,

    /// RAM latency in cycles [default: 1]
    #[arg(long, value_parser = parse_number::<u64>)]
    pub latency_mem: Option<u64>,

    /// ROM size in bytes, a power of two [default: 0x100000]
    #[arg(long, value_parser = parse_number::<u32>)]
    pub rom_size: Option<u32>,

    /// Ownership block size in bytes, a power of two [default: 0x1000]
    #[arg(long, value_parser = parse_number::<u32>)]
    pub block_size: Option<u32>,

    /// ROM content file, one word per line
    #[arg(long)]
    pub rom_content: Option<PathBuf>,

    /// Ownership tracking granularity [default: byte]
    #[arg(long, value_enum)]
    pub ownership: Option<OwnershipMode>,

    /// Cycles to wait for a store before failing the request, 0 waits forever [default: 0]
    #[arg(long, value_parser = parse_number::<u64>)]
    pub wait_timeout: Option<u64>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Request file (.csv)
    pub input: PathBuf,
}

impl Args {
    /// Builds the effective configuration.
    ///
    /// Starts from the configuration file (or the defaults), applies every
    /// option given on the command line and validates the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid input path, an unreadable
    /// configuration file or a configuration that fails validation.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        validate_input_path(&self.input)?;

        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(cycles) = self.cycles {
            config.cycles = cycles;
        }
        if let Some(path) = &self.tracefile {
            config.tracefile = Some(path.clone());
        }
        if let Some(latency) = self.latency_rom {
            config.latency_rom = latency;
        }
        if let Some(latency) = self.latency_mem {
            config.latency_mem = latency;
        }
        if let Some(size) = self.rom_size {
            config.rom_size = size;
        }
        if let Some(size) = self.block_size {
            config.block_size = size;
        }
        if let Some(path) = &self.rom_content {
            config.rom_content = Some(path.clone());
        }
        if let Some(mode) = self.ownership {
            config.ownership = mode;
        }
        if let Some(timeout) = self.wait_timeout {
            config.wait_timeout = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    /// Log level selected by the `-v` count.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
