//! Common utilities and types used throughout the memory controller simulator.
//!
//! This module provides the request/response signal types, user identifiers,
//! fault taxonomy, and shared constants that are used by the decoder, the
//! protection engine, the request dispatcher, and the simulation driver.

/// Common constants used throughout the simulator.
pub mod constants;

/// Request, response and user identifier types.
pub mod data;

/// Error types and access fault definitions.
pub mod error;

pub use data::{AccessType, AccessWidth, MemoryRequest, Response, UserId};
pub use error::{AccessFault, ConfigError, FaultClass, LoadError};

pub use constants::{BYTE_MASK, WORD_BYTES};
