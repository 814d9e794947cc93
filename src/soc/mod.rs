//! System-on-Chip components: the memory controller, its backing stores and
//! the wiring between them.

/// System builder wiring the controller from a configuration.
pub mod builder;

/// Point-to-point interconnect between the controller and its stores.
pub mod interconnect;

/// Memory controller, protection and backing stores.
pub mod memory;

/// Backing store interface.
pub mod traits;

pub use builder::System;
