//! General read/write store.
//!
//! Backed by 4 KiB pages allocated on first write so the store can cover
//! the whole general region. Unwritten bytes read as zero.

use std::collections::HashMap;

use super::map::Region;
use super::port::LatencyPort;
use crate::common::constants::{RAM_PAGE_BYTES, RAM_PAGE_MASK, RAM_PAGE_SHIFT};
use crate::soc::traits::{BackingStore, StoreCommand};

/// Main memory backing store.
pub struct Ram {
    pages: HashMap<u32, Box<[u8; RAM_PAGE_BYTES]>>,
    port: LatencyPort,
}

impl Ram {
    /// Creates an empty store with the given latency.
    pub fn new(latency: u64) -> Self {
        Self {
            pages: HashMap::new(),
            port: LatencyPort::new(latency),
        }
    }

    /// Number of pages allocated so far.
    pub fn resident_pages(&self) -> usize {
        self.pages.len()
    }

    fn write_u8(&mut self, addr: u32, val: u8) {
        let page = self
            .pages
            .entry(addr >> RAM_PAGE_SHIFT)
            .or_insert_with(|| Box::new([0; RAM_PAGE_BYTES]));
        page[(addr & RAM_PAGE_MASK) as usize] = val;
    }

    fn write_u32(&mut self, addr: u32, val: u32) {
        for (i, byte) in val.to_le_bytes().into_iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u32), byte);
        }
    }
}

impl BackingStore for Ram {
    fn name(&self) -> &str {
        "RAM"
    }

    fn region(&self) -> Region {
        Region::General
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
            StoreCommand::Read { addr } => Some(self.peek_u32(addr)),
            StoreCommand::Write { addr, data } => {
                self.write_u32(addr, data);
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

    #[inline(always)]
    fn peek_u8(&self, addr: u32) -> u8 {
        self.pages
            .get(&(addr >> RAM_PAGE_SHIFT))
            .map_or(0, |page| page[(addr & RAM_PAGE_MASK) as usize])
    }

    fn load_bytes(&mut self, addr: u32, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u32), *byte);
        }
    }
}
