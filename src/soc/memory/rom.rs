//! Read-only program store.
//!
//! Content is fixed at construction. Bytes beyond the loaded content but
//! inside the ROM read as zero. Write commands are acknowledged like any
//! other command but never change the content.

use tracing::warn;

use super::map::Region;
use super::port::LatencyPort;
use crate::soc::traits::{BackingStore, StoreCommand};

/// ROM backing store.
pub struct Rom {
    content: Vec<u8>,
    size: u32,
    port: LatencyPort,
}

impl Rom {
    /// Creates a zero-filled ROM of `size` bytes.
    pub fn new(size: u32, latency: u64) -> Self {
        Self {
            content: Vec::new(),
            size,
            port: LatencyPort::new(latency),
        }
    }

    /// Creates a ROM whose first words are `words`, stored little-endian.
    ///
    /// Words that do not fit inside `size` bytes are dropped; the loader
    /// rejects such content before it gets here.
    pub fn with_words(size: u32, latency: u64, words: &[u32]) -> Self {
        let mut rom = Self::new(size, latency);
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        rom.load_bytes(0, &bytes);
        rom
    }

    fn read_u32(&self, addr: u32) -> u32 {
        self.peek_u32(addr)
    }
}

impl BackingStore for Rom {
    fn name(&self) -> &str {
        "ROM"
    }

    fn region(&self) -> Region {
        Region::ReadOnly
    }

    fn latency(&self) -> u64 {
        self.port.latency()
    }

    fn issue(&mut self, command: StoreCommand) {
        self.port.begin(command);
    }

    fn tick(&mut self) {
        self.port.tick();
    }

    fn complete(&mut self) -> Option<u32> {
        match self.port.take_ready()? {
            StoreCommand::Read { addr } => Some(self.read_u32(addr)),
            StoreCommand::Write { addr, .. } => {
                warn!("ROM ignored write enable at {addr:#010x}");
                Some(0)
            }
        }
    }

    fn cancel(&mut self) {
        self.port.clear();
    }

    fn is_busy(&self) -> bool {
        self.port.is_busy()
    }

    fn peek_u8(&self, addr: u32) -> u8 {
        self.content.get(addr as usize).copied().unwrap_or(0)
    }

    fn load_bytes(&mut self, addr: u32, data: &[u8]) {
        let start = addr as usize;
        let end = (start + data.len()).min(self.size as usize);
        if end <= start {
            return;
        }
        if self.content.len() < end {
            self.content.resize(end, 0);
        }
        self.content[start..end].copy_from_slice(&data[..end - start]);
    }
}
