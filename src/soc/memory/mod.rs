//! Memory subsystem: address decoding, ownership protection, the two
//! backing stores and the request dispatcher that ties them together.

/// Request dispatcher state machine.
pub mod controller;
/// Address decoder for the read-only and general regions.
pub mod map;
/// Sparse per-address ownership records.
pub mod ownership;
/// Fixed-latency enable/ready handshake shared by both stores.
pub mod port;
/// Ownership-based access checks.
pub mod protection;
/// Sparse general read/write store.
pub mod ram;
/// Read-only program store.
pub mod rom;

pub use controller::{ControllerState, MemoryController};
pub use map::{AddressDecoder, Region};
pub use ownership::OwnershipTable;
pub use protection::ProtectionEngine;
pub use ram::Ram;
pub use rom::Rom;
