//! Backing Store Traits.
//!
//! This module defines the interface shared by the two backing stores the
//! controller drives: the read-only program store and the general store.
//! Both follow the same handshake: an enable pulse carries a command, and
//! `ready` is asserted a fixed number of cycles later.

use serde::Serialize;

use crate::soc::memory::map::Region;

/// Command carried by a store enable pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StoreCommand {
    /// Read the little-endian word starting at `addr`.
    Read {
        /// Byte address.
        addr: u32,
    },
    /// Write `data` as a little-endian word starting at `addr`.
    Write {
        /// Byte address.
        addr: u32,
        /// Word to store.
        data: u32,
    },
}

/// Trait for timing-modelled backing stores.
///
/// A store services one command at a time. The controller issues a command,
/// advances the store clock once per cycle, and polls [`BackingStore::complete`]
/// until it returns the read data.
pub trait BackingStore {
    /// Returns the display name of the store.
    fn name(&self) -> &str;

    /// Region of the address space this store serves.
    fn region(&self) -> Region;

    /// Cycles between an enable pulse and the matching `ready`.
    fn latency(&self) -> u64;

    /// Drives the enable lines with `command`.
    ///
    /// Replaces any command still in flight.
    fn issue(&mut self, command: StoreCommand);

    /// Advances the store by one clock cycle.
    fn tick(&mut self);

    /// Retires the in-flight command if `ready` is asserted this cycle.
    ///
    /// # Returns
    ///
    /// `Some(rdata)` in the cycle the command completes (zero for writes),
    /// `None` while the store is still busy or idle.
    fn complete(&mut self) -> Option<u32>;

    /// Drops the in-flight command without completing it.
    fn cancel(&mut self);

    /// Returns `true` while a command is in flight.
    fn is_busy(&self) -> bool;

    /// Reads a byte through the zero-latency back door.
    fn peek_u8(&self, addr: u32) -> u8;

    /// Reads a little-endian word through the zero-latency back door.
    fn peek_u32(&self, addr: u32) -> u32 {
        u32::from_le_bytes([
            self.peek_u8(addr),
            self.peek_u8(addr.wrapping_add(1)),
            self.peek_u8(addr.wrapping_add(2)),
            self.peek_u8(addr.wrapping_add(3)),
        ])
    }

    /// Writes bytes through the zero-latency back door, used for preloading.
    fn load_bytes(&mut self, addr: u32, data: &[u8]);
}
