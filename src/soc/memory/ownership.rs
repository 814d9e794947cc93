//! Ownership Table.
//!
//! Sparse mapping from address to owning user. A missing entry means the
//! location is unclaimed. The table is keyed by `address / granularity`:
//! a granularity of one tracks individual bytes, a larger power of two
//! tracks whole blocks with the same policy.

use std::collections::BTreeMap;

use crate::common::UserId;

/// Per-address ownership records for the general region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipTable {
    owners: BTreeMap<u32, UserId>,
    granularity: u32,
}

impl Default for OwnershipTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnershipTable {
    /// Creates an empty byte-granular table.
    pub fn new() -> Self {
        Self::with_granularity(1)
    }

    /// Creates an empty table tracking units of `granularity` bytes.
    ///
    /// A granularity of zero is treated as one.
    pub fn with_granularity(granularity: u32) -> Self {
        Self {
            owners: BTreeMap::new(),
            granularity: granularity.max(1),
        }
    }

    /// Size in bytes of one tracked unit.
    pub fn granularity(&self) -> u32 {
        self.granularity
    }

    #[inline(always)]
    fn key(&self, addr: u32) -> u32 {
        addr / self.granularity
    }

    /// Returns the owner of `addr`, if any.
    pub fn owner(&self, addr: u32) -> Option<UserId> {
        self.owners.get(&self.key(addr)).copied()
    }

    /// Assigns `user` as owner of `addr`, replacing any previous owner.
    pub fn claim(&mut self, addr: u32, user: UserId) {
        let key = self.key(addr);
        self.owners.insert(key, user);
    }

    /// Removes the ownership entry for `addr`, returning the previous owner.
    pub fn release(&mut self, addr: u32) -> Option<UserId> {
        let key = self.key(addr);
        self.owners.remove(&key)
    }

    /// Number of tracked units that currently have an owner.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns `true` if nothing is owned.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Iterates over `(first address of unit, owner)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, UserId)> + '_ {
        let granularity = self.granularity;
        self.owners
            .iter()
            .map(move |(key, user)| (key.wrapping_mul(granularity), *user))
    }
}
