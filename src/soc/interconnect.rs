//! Store Interconnect.
//!
//! This module connects the request dispatcher to its two backing stores.
//! It routes a classified access to the store serving that region and
//! advances the clock of every store once per cycle.

use tracing::info;

use super::memory::map::Region;
use super::traits::BackingStore;

/// Point-to-point wiring between the controller and its stores.
pub struct Interconnect {
    rom: Box<dyn BackingStore>,
    ram: Box<dyn BackingStore>,
}

impl Interconnect {
    /// Wires the read-only and general stores.
    ///
    /// # Arguments
    ///
    /// * `rom` - Store serving [`Region::ReadOnly`]
    /// * `ram` - Store serving [`Region::General`]
    pub fn new(rom: Box<dyn BackingStore>, ram: Box<dyn BackingStore>) -> Self {
        for store in [&rom, &ram] {
            info!(
                "registered store {:<4} for {} region, latency {} cycles",
                store.name(),
                store.region(),
                store.latency()
            );
        }
        Self { rom, ram }
    }

    /// Returns the store serving `region`.
    pub fn store(&self, region: Region) -> &dyn BackingStore {
        match region {
            Region::ReadOnly => self.rom.as_ref(),
            Region::General => self.ram.as_ref(),
        }
    }

    /// Returns the store serving `region` for driving its enable lines.
    pub fn store_mut(&mut self, region: Region) -> &mut dyn BackingStore {
        match region {
            Region::ReadOnly => self.rom.as_mut(),
            Region::General => self.ram.as_mut(),
        }
    }

    /// Advances every store by one cycle.
    pub fn tick(&mut self) {
        self.rom.tick();
        self.ram.tick();
    }

    /// Loads a binary blob into the store serving `region` at `addr`.
    pub fn load_binary_at(&mut self, region: Region, data: &[u8], addr: u32) {
        info!("writing {} bytes to {} at {:#010x}", data.len(), region, addr);
        self.store_mut(region).load_bytes(addr, data);
    }
}
