//! Simulator-wide constants.

/// Width of the native data word in bytes.
pub const WORD_BYTES: u32 = 4;

/// Mask selecting the low byte of a word; narrow accesses live here.
pub const BYTE_MASK: u32 = 0xFF;

/// Log2 of the page size used by the sparse general store.
pub const RAM_PAGE_SHIFT: u32 = 12;

/// Page size in bytes of the sparse general store.
pub const RAM_PAGE_BYTES: usize = 1 << RAM_PAGE_SHIFT;

/// Mask extracting the offset within a general-store page.
pub const RAM_PAGE_MASK: u32 = (1 << RAM_PAGE_SHIFT) - 1;
