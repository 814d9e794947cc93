//! Protected Memory Controller Simulator CLI.
//!
//! The main executable for the simulator. It parses the command line,
//! loads the request and ROM content files, builds the system and plays the
//! requests through the memory controller cycle by cycle.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use memguard_sim::cli::Args;
use memguard_sim::config::{Config, OwnershipMode};
use memguard_sim::sim::{self, loader, TraceWriter};
use memguard_sim::soc::System;

/// Main entry point for the memory controller simulator.
///
/// # Behavior
///
/// 1. **Configuration**: Parses command-line arguments, merges them over the
///    optional TOML file and validates the result.
/// 2. **Loading**: Reads the ROM content (if any) and the request file.
/// 3. **Simulation**: Presents each request until the controller completes
///    it, or until the cycle budget runs out.
/// 4. **Teardown**: Prints the run summary and statistics. Exits non-zero if
///    any step before the simulation failed.
fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run(&args) {
        eprintln!("\n[!] FATAL: {err:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.resolve().context("invalid configuration")?;
    print_config(&config, args);

    let rom_words = match &config.rom_content {
        Some(path) => loader::load_rom_content(path, config.rom_size)
            .context("failed to load ROM content")?,
        None => Vec::new(),
    };
    let trace = loader::load_requests(&args.input).context("failed to load requests")?;

    let mut system = System::new(&config, &rom_words);

    let result = match &config.tracefile {
        Some(path) => {
            let mut writer = TraceWriter::create(path)
                .with_context(|| format!("cannot create trace file '{}'", path.display()))?;
            let result =
                sim::run_simulation(&mut system, &trace.requests, config.cycles, Some(&mut writer))
                    .context("failed to write trace")?;
            writer.finish().context("failed to flush trace")?;
            result
        }
        None => sim::run_simulation::<std::io::Sink>(
            &mut system,
            &trace.requests,
            config.cycles,
            None,
        )?,
    };

    println!("\n==========================================================");
    println!("RUN SUMMARY");
    println!("==========================================================");
    println!("cycles                   {}", result.cycles);
    println!(
        "requests                 {}/{}",
        result.completed,
        trace.requests.len()
    );
    println!("rows_skipped             {}", trace.skipped);
    println!("errors                   {}", result.errors);
    println!(
        "finished                 {}",
        if result.finished { "yes" } else { "no (cycle budget exhausted)" }
    );

    system.controller.stats.print();
    Ok(())
}

fn print_config(config: &Config, args: &Args) {
    println!("Global Configuration");
    println!("--------------------");
    println!("  Input:              {}", args.input.display());
    println!("  Cycle Budget:       {}", config.cycles);
    println!("  ROM Size:           {:#x}", config.rom_size);
    println!("  ROM Latency:        {}", config.latency_rom);
    println!("  RAM Latency:        {}", config.latency_mem);
    match config.ownership {
        OwnershipMode::Byte => println!("  Ownership:          byte"),
        OwnershipMode::Block => {
            println!("  Ownership:          block ({:#x} bytes)", config.block_size)
        }
    }
    if config.wait_timeout > 0 {
        println!("  Wait Timeout:       {} cycles", config.wait_timeout);
    }
    if let Some(path) = &config.rom_content {
        println!("  ROM Content:        {}", path.display());
    }
    if let Some(path) = &config.tracefile {
        println!("  Trace File:         {}", path.display());
    }
}
