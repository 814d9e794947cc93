//! Error Types.
//!
//! Access faults are reported by the controller through its `error` output
//! and never abort the simulation. Configuration and load errors are fatal
//! and are raised before the first cycle runs.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::soc::memory::map::Region;

/// Classes of access fault, used for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultClass {
    /// Caller violated the request protocol.
    Protocol,
    /// Access rejected by the protection engine.
    AccessDenied,
    /// Wide access crossing a region boundary.
    Straddle,
    /// Backing store did not answer in time.
    Timeout,
}

/// Fault reported for a rejected or abandoned request.
///
/// Every fault leaves memory contents and ownership unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
pub enum AccessFault {
    /// Read and write enable asserted together.
    #[error("simultaneous read and write requested at {addr:#010x}")]
    ProtocolViolation {
        /// Requested address.
        addr: u32,
    },
    /// Write touching the read-only region.
    #[error("write to read-only address {addr:#010x} is forbidden")]
    RomWrite {
        /// First read-only byte touched.
        addr: u32,
    },
    /// Ordinary user touching a byte owned by another user.
    #[error("user {user} has no permission on address {addr:#010x} (owner {owner})")]
    OwnershipViolation {
        /// Denied byte address.
        addr: u32,
        /// Requesting user.
        user: u8,
        /// Current owner of the byte.
        owner: u8,
    },
    /// Wide access spanning both regions or wrapping the address space.
    #[error("wide access at {addr:#010x} crosses a region boundary")]
    BoundaryStraddle {
        /// Requested address.
        addr: u32,
    },
    /// Backing store did not assert ready within the configured bound.
    #[error("{region} store did not respond within {cycles} cycles")]
    Timeout {
        /// Store being waited on.
        region: Region,
        /// Cycles waited.
        cycles: u64,
    },
}

impl AccessFault {
    /// Returns the statistics class for this fault.
    pub const fn class(&self) -> FaultClass {
        match self {
            Self::ProtocolViolation { .. } => FaultClass::Protocol,
            Self::RomWrite { .. } | Self::OwnershipViolation { .. } => FaultClass::AccessDenied,
            Self::BoundaryStraddle { .. } => FaultClass::Straddle,
            Self::Timeout { .. } => FaultClass::Timeout,
        }
    }
}

/// Invalid configuration detected before simulation starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Numeric option that is neither decimal nor `0x` hexadecimal, or out of range.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// Size option that must be a power of two.
    #[error("{name} must be a non-zero power of two, got {value:#x}")]
    NotPowerOfTwo {
        /// Option name.
        name: &'static str,
        /// Rejected value.
        value: u32,
    },

    /// Block ownership with a ROM size that splits a block.
    #[error("rom size {rom_size:#x} is not a multiple of block size {block_size:#x}")]
    BlockMisaligned {
        /// Configured ROM size.
        rom_size: u32,
        /// Configured block size.
        block_size: u32,
    },

    /// Cycle budget of zero.
    #[error("cycle budget must be non-zero")]
    ZeroCycles,

    /// Positional input that is not a `.csv` file.
    #[error("input file '{}' is invalid, expected a .csv file", .0.display())]
    InvalidInputFile(PathBuf),

    /// Configuration file could not be read.
    #[error("failed to read config file '{}'", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::config::Config`].
    #[error("failed to parse config file '{}'", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },
}

/// Failure loading a request file or ROM content file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be opened or read.
    #[error("cannot open '{}'", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Request file without even a header row.
    #[error("request file '{}' is empty", .0.display())]
    EmptyRequestFile(PathBuf),

    /// ROM content larger than the ROM.
    #[error("ROM content holds {words} words but the ROM fits only {capacity}")]
    RomOverflow {
        /// Words in the content file.
        words: usize,
        /// Words the ROM can hold.
        capacity: usize,
    },
}
