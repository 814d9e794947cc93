use std::fs;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::common::ConfigError;

pub const DEFAULT_CYCLES: u64 = 100_000;
pub const DEFAULT_LATENCY_ROM: u64 = 1;
pub const DEFAULT_LATENCY_MEM: u64 = 1;
pub const DEFAULT_ROM_SIZE: u32 = 0x10_0000;
pub const DEFAULT_BLOCK_SIZE: u32 = 0x1000;

/// Granularity at which the ownership table records owners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipMode {
    /// One owner per byte.
    #[default]
    Byte,
    /// One owner per `block_size` bytes.
    Block,
}

/// Simulation parameters.
///
/// Loaded from an optional TOML file, then overridden by the command line.
/// Numeric values may be written as integers or as decimal / `0x` strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_cycles", deserialize_with = "de_number")]
    pub cycles: u64,

    #[serde(default, alias = "tf")]
    pub tracefile: Option<PathBuf>,

    #[serde(default = "default_latency_rom", deserialize_with = "de_number")]
    pub latency_rom: u64,

    #[serde(default = "default_latency_mem", deserialize_with = "de_number")]
    pub latency_mem: u64,

    #[serde(default = "default_rom_size", deserialize_with = "de_number")]
    pub rom_size: u32,

    #[serde(default = "default_block_size", deserialize_with = "de_number")]
    pub block_size: u32,

    #[serde(default)]
    pub rom_content: Option<PathBuf>,

    #[serde(default)]
    pub ownership: OwnershipMode,

    #[serde(default, deserialize_with = "de_number")]
    pub wait_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycles: DEFAULT_CYCLES,
            tracefile: None,
            latency_rom: DEFAULT_LATENCY_ROM,
            latency_mem: DEFAULT_LATENCY_MEM,
            rom_size: DEFAULT_ROM_SIZE,
            block_size: DEFAULT_BLOCK_SIZE,
            rom_content: None,
            ownership: OwnershipMode::Byte,
            wait_timeout: 0,
        }
    }
}

impl Config {
    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks the invariants the simulator relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycles == 0 {
            return Err(ConfigError::ZeroCycles);
        }
        if !self.rom_size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                name: "rom-size",
                value: self.rom_size,
            });
        }
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                name: "block-size",
                value: self.block_size,
            });
        }
        if self.ownership == OwnershipMode::Block && self.rom_size % self.block_size != 0 {
            return Err(ConfigError::BlockMisaligned {
                rom_size: self.rom_size,
                block_size: self.block_size,
            });
        }
        Ok(())
    }

    /// Bytes covered by one ownership table entry.
    pub fn ownership_granularity(&self) -> u32 {
        match self.ownership {
            OwnershipMode::Byte => 1,
            OwnershipMode::Block => self.block_size,
        }
    }
}

/// Checks that the request file path names a `.csv` file.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidInputFile`] otherwise.
pub fn validate_input_path(path: &Path) -> Result<(), ConfigError> {
    if path.to_string_lossy().ends_with(".csv") {
        Ok(())
    } else {
        Err(ConfigError::InvalidInputFile(path.to_path_buf()))
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal number.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidNumber`] when `s` is not a number or does
/// not fit in `T`.
pub fn parse_number<T: TryFrom<u64>>(s: &str) -> Result<T, ConfigError> {
    let trimmed = s.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) if hex.starts_with(|c: char| c == '+' || c == '-') => {
            return Err(ConfigError::InvalidNumber(s.to_string()))
        }
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed
        .ok()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| ConfigError::InvalidNumber(s.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Int(u64),
    Text(String),
}

fn de_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    match NumberRepr::deserialize(deserializer)? {
        NumberRepr::Int(n) => {
            T::try_from(n).map_err(|_| D::Error::custom(format!("number {n} out of range")))
        }
        NumberRepr::Text(s) => parse_number(&s).map_err(D::Error::custom),
    }
}

fn default_cycles() -> u64 {
    DEFAULT_CYCLES
}

fn default_latency_rom() -> u64 {
    DEFAULT_LATENCY_ROM
}

fn default_latency_mem() -> u64 {
    DEFAULT_LATENCY_MEM
}

fn default_rom_size() -> u32 {
    DEFAULT_ROM_SIZE
}

fn default_block_size() -> u32 {
    DEFAULT_BLOCK_SIZE
}

#[cfg(test)]
mod tests {
    use super::{parse_number, Config, OwnershipMode};
    use crate::common::ConfigError;

    #[test]
    fn parse_number_accepts_decimal_and_hex() {
        assert_eq!(parse_number::<u32>("4096").ok(), Some(4096));
        assert_eq!(parse_number::<u32>("0x1000").ok(), Some(4096));
        assert_eq!(parse_number::<u32>("0X1f").ok(), Some(31));
        assert_eq!(parse_number::<u64>(" 7 ").ok(), Some(7));
    }

    #[test]
    fn parse_number_rejects_garbage_and_overflow() {
        for bad in ["", "0x", "12abc", "-1", "0x+5", "0x-5", "0x1_0000_0000", "4294967296"] {
            assert!(matches!(
                parse_number::<u32>(bad),
                Err(ConfigError::InvalidNumber(_))
            ));
        }
    }

    #[test]
    fn toml_accepts_numbers_and_hex_strings() {
        let config: Config = toml::from_str(
            r#"
            cycles = 500
            rom-size = "0x100"
            block-size = 16
            ownership = "block"
            tf = "trace.jsonl"
            "#,
        )
        .expect("valid config");
        assert_eq!(config.cycles, 500);
        assert_eq!(config.rom_size, 0x100);
        assert_eq!(config.ownership, OwnershipMode::Block);
        assert_eq!(config.ownership_granularity(), 16);
        assert_eq!(config.latency_rom, 1);
        assert!(config.tracefile.is_some());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }
}
