//! Memory Request Types.
//!
//! This module defines the signal bundles exchanged between the processor
//! side and the memory controller: the request presented on the input
//! wires, the response sampled while `ready` is high, and the identifier of
//! the user on whose behalf an access is made.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::WORD_BYTES;
use super::error::AccessFault;

/// Direction of a memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AccessType {
    /// Data read access.
    Read,

    /// Data write access.
    Write,
}

/// Width of a memory access.
///
/// Narrow accesses touch a single byte and carry their value in the low
/// 8 bits of the word-sized data path. Wide accesses touch four contiguous
/// bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AccessWidth {
    /// 1-byte access.
    Byte,

    /// 4-byte word access.
    Word,
}

impl AccessWidth {
    /// Maps the `wide` request flag to an access width.
    pub const fn from_wide(wide: bool) -> Self {
        if wide {
            Self::Word
        } else {
            Self::Byte
        }
    }

    /// Number of bytes touched by an access of this width.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Word => WORD_BYTES,
        }
    }
}

/// Identifier of the logical user issuing a request.
///
/// Users `0` and `255` are privileged and bypass ownership checks. User
/// `255` additionally releases ownership of every byte it writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u8);

impl UserId {
    /// Supervisor identifier; neither claims nor releases ownership.
    pub const SUPERVISOR: Self = Self(0);

    /// Releasing supervisor identifier.
    pub const RELEASE: Self = Self(255);

    /// Returns the raw identifier value.
    pub const fn val(self) -> u8 {
        self.0
    }

    /// Returns `true` for the identifiers exempt from ownership checks.
    pub const fn is_privileged(self) -> bool {
        self.0 == Self::SUPERVISOR.0 || self.0 == Self::RELEASE.0
    }

    /// Returns `true` if writes by this user clear ownership.
    pub const fn releases_ownership(self) -> bool {
        self.0 == Self::RELEASE.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for UserId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// Request signals presented to the controller for one access.
///
/// The driver holds these values stable until it observes `ready`.
/// A bundle with neither `read` nor `write` asserted means no request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryRequest {
    /// Byte address of the first touched byte.
    pub address: u32,
    /// Data to write; only the low byte is used by narrow writes.
    pub write_data: u32,
    /// Read enable.
    pub read: bool,
    /// Write enable.
    pub write: bool,
    /// `true` for a 4-byte access, `false` for a 1-byte access.
    pub wide: bool,
    /// Requesting user.
    pub user: UserId,
}

impl MemoryRequest {
    /// Builds a read request.
    pub fn read(address: u32, wide: bool, user: u8) -> Self {
        Self {
            address,
            read: true,
            wide,
            user: UserId(user),
            ..Self::default()
        }
    }

    /// Builds a write request.
    pub fn write(address: u32, data: u32, wide: bool, user: u8) -> Self {
        Self {
            address,
            write_data: data,
            write: true,
            wide,
            user: UserId(user),
            ..Self::default()
        }
    }

    /// Returns `true` if any enable line is asserted.
    pub const fn is_present(&self) -> bool {
        self.read || self.write
    }

    /// Returns `true` if both enables are asserted at once.
    pub const fn is_protocol_violation(&self) -> bool {
        self.read && self.write
    }

    /// Returns the access width selected by the `wide` flag.
    pub const fn width(&self) -> AccessWidth {
        AccessWidth::from_wide(self.wide)
    }

    /// Returns the access direction, or `None` when the enables are not
    /// exactly one of read or write.
    pub const fn access_type(&self) -> Option<AccessType> {
        match (self.read, self.write) {
            (true, false) => Some(AccessType::Read),
            (false, true) => Some(AccessType::Write),
            _ => None,
        }
    }

    /// Iterates over every byte address touched by this request.
    ///
    /// Addresses past `u32::MAX` are not produced; the decoder rejects such
    /// requests before they reach the protection engine.
    pub fn touched_bytes(&self) -> impl Iterator<Item = u32> {
        let base = self.address;
        (0..self.width().bytes()).filter_map(move |i| base.checked_add(i))
    }
}

/// Output signals of the controller for one cycle.
///
/// `rdata` is meaningful only when `ready` is high, `error` is low and the
/// completed request was a read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Completion pulse.
    pub ready: bool,
    /// High iff the completed request failed.
    pub error: bool,
    /// Read data.
    pub rdata: u32,
    /// Fault that caused `error`, for diagnostics.
    pub fault: Option<AccessFault>,
}

impl Response {
    /// Output while no request completes this cycle.
    pub const fn busy() -> Self {
        Self {
            ready: false,
            error: false,
            rdata: 0,
            fault: None,
        }
    }

    /// Successful completion carrying `rdata`.
    pub const fn done(rdata: u32) -> Self {
        Self {
            ready: true,
            error: false,
            rdata,
            fault: None,
        }
    }

    /// Failed completion.
    pub const fn failed(fault: AccessFault) -> Self {
        Self {
            ready: true,
            error: true,
            rdata: 0,
            fault: Some(fault),
        }
    }
}

impl From<Result<u32, AccessFault>> for Response {
    fn from(outcome: Result<u32, AccessFault>) -> Self {
        match outcome {
            Ok(rdata) => Self::done(rdata),
            Err(fault) => Self::failed(fault),
        }
    }
}
