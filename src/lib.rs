//! Protected Memory Controller Simulator Library.
//!
//! This crate implements a cycle-driven model of a memory controller that
//! fronts a read-only program store and a general read/write store. Every
//! request is checked against a per-byte ownership table before it reaches
//! a store, and narrow writes are turned into a read-modify-write sequence.
//!
//! # Architecture
//!
//! * **Decoder**: Splits the 32-bit address space into ROM and RAM regions.
//! * **Protection**: Ownership-based access control for the general region.
//! * **Dispatcher**: One-request-at-a-time state machine driving the stores.
//!
//! # Modules
//!
//! * `cli`: Command-line arguments.
//! * `common`: Shared request/response types, constants, and error handling.
//! * `config`: Configuration loading and validation.
//! * `sim`: Input loaders, the simulation driver and the cycle trace.
//! * `soc`: Memory controller and backing stores.
//! * `stats`: Statistics collection.

/// Command-line argument parsing and merging over the configuration file.
pub mod cli;

/// Shared request/response types, constants, and error types.
///
/// Provides the signal bundles exchanged with the controller and the fault
/// types reported through its `error` output.
pub mod common;

/// Simulation parameters with defaults, TOML loading and validation.
pub mod config;

/// Simulation harness, input loaders, and the cycle trace.
pub mod sim;

/// Memory controller, address decoder, protection engine, and backing stores.
pub mod soc;

/// Request, fault and cycle statistics.
pub mod stats;
