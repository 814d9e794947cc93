//! System Builder.
//!
//! This module defines the `System` structure, the container for the memory
//! controller and everything behind it. It wires the address decoder, the
//! ownership table and both backing stores according to the configuration.

use tracing::info;

use crate::common::{MemoryRequest, Response};
use crate::config::Config;
use crate::soc::interconnect::Interconnect;
use crate::soc::memory::{AddressDecoder, MemoryController, OwnershipTable, Ram, Rom};

/// Top-level simulated system.
///
/// The request driver only talks to the controller; the stores are reached
/// through it.
pub struct System {
    /// Memory controller fronting the ROM and RAM.
    pub controller: MemoryController,
}

impl System {
    /// Creates a new system instance with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated simulation configuration
    /// * `rom_words` - Initial ROM content, one little-endian word per entry
    ///
    /// # Returns
    ///
    /// A new `System` whose controller is idle at cycle zero.
    pub fn new(config: &Config, rom_words: &[u32]) -> Self {
        let decoder = AddressDecoder::new(config.rom_size);
        let ownership = OwnershipTable::with_granularity(config.ownership_granularity());

        let rom = Rom::with_words(config.rom_size, config.latency_rom, rom_words);
        let ram = Ram::new(config.latency_mem);
        let bus = Interconnect::new(Box::new(rom), Box::new(ram));

        info!(
            "ROM [0x00000000, {:#010x}) with {} preloaded words, ownership granularity {} bytes",
            config.rom_size,
            rom_words.len(),
            ownership.granularity()
        );

        let controller =
            MemoryController::new(decoder, ownership, bus).with_wait_timeout(config.wait_timeout);

        Self { controller }
    }

    /// Advances the system by one cycle with `input` on the request wires.
    pub fn tick(&mut self, input: &MemoryRequest) -> Response {
        self.controller.tick(input)
    }
}
