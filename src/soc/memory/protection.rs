//! Protection Engine.
//!
//! Decides whether a request may proceed, byte by byte, against the address
//! decoder and the ownership table, and records ownership changes once a
//! write has been applied.

use tracing::{debug, warn};

use super::map::{AddressDecoder, Region};
use super::ownership::OwnershipTable;
use crate::common::{AccessFault, MemoryRequest};

/// Ownership-based access control for the general region.
///
/// Holds no state of its own; the ownership table is owned by the request
/// dispatcher and lent to the engine for each check or update.
pub struct ProtectionEngine;

impl ProtectionEngine {
    /// Checks every byte touched by `request`.
    ///
    /// * **Read-only byte:** reads are allowed, writes are always rejected.
    /// * **General byte, privileged user:** always allowed.
    /// * **General byte, ordinary user:** allowed if unowned or owned by the
    ///   requester.
    ///
    /// A single denied byte rejects the whole request.
    ///
    /// # Arguments
    ///
    /// * `decoder` - Address decoder holding the ROM size
    /// * `table` - Current ownership records
    /// * `request` - Request with exactly one enable asserted
    ///
    /// # Errors
    ///
    /// Returns [`AccessFault::RomWrite`] or [`AccessFault::OwnershipViolation`]
    /// for the first denied byte.
    pub fn check_access(
        decoder: &AddressDecoder,
        table: &OwnershipTable,
        request: &MemoryRequest,
    ) -> Result<(), AccessFault> {
        let user = request.user;

        for addr in request.touched_bytes() {
            if decoder.classify(addr) == Region::ReadOnly {
                if request.write {
                    warn!("write to ROM address {addr:#010x} rejected");
                    return Err(AccessFault::RomWrite { addr });
                }
                continue;
            }

            if user.is_privileged() {
                continue;
            }

            match table.owner(addr) {
                Some(owner) if owner != user => {
                    warn!("user {user} has no permission on address {addr:#010x} (owner {owner})");
                    return Err(AccessFault::OwnershipViolation {
                        addr,
                        user: user.val(),
                        owner: owner.val(),
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Updates ownership after `request`, a write, has been applied.
    ///
    /// * users `1..=254` claim every touched byte;
    /// * user `255` releases every touched byte;
    /// * user `0` leaves the table unchanged.
    pub fn update_ownership(table: &mut OwnershipTable, request: &MemoryRequest) {
        let user = request.user;

        if user.releases_ownership() {
            for addr in request.touched_bytes() {
                if let Some(previous) = table.release(addr) {
                    debug!("ownership of {addr:#010x} released from user {previous}");
                }
            }
        } else if !user.is_privileged() {
            for addr in request.touched_bytes() {
                table.claim(addr, user);
            }
            debug!("user {user} claimed {:#010x} ({:?})", request.address, request.width());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProtectionEngine;
    use crate::common::{AccessFault, MemoryRequest, UserId};
    use crate::soc::memory::map::AddressDecoder;
    use crate::soc::memory::ownership::OwnershipTable;

    const DECODER: AddressDecoder = AddressDecoder::new(0x100);

    #[test]
    fn rom_reads_allowed_for_everyone() {
        let table = OwnershipTable::new();
        for user in [0u8, 1, 77, 255] {
            let req = MemoryRequest::read(0x10, true, user);
            assert_eq!(ProtectionEngine::check_access(&DECODER, &table, &req), Ok(()));
        }
    }

    #[test]
    fn rom_write_rejected_even_for_supervisor() {
        let table = OwnershipTable::new();
        for user in [0u8, 3, 255] {
            let req = MemoryRequest::write(0x10, 0, false, user);
            assert_eq!(
                ProtectionEngine::check_access(&DECODER, &table, &req),
                Err(AccessFault::RomWrite { addr: 0x10 })
            );
        }
    }

    #[test]
    fn partial_overlap_rejects_whole_wide_access() {
        let mut table = OwnershipTable::new();
        table.claim(0x1003, UserId(4));

        let req = MemoryRequest::read(0x1000, true, 6);
        assert_eq!(
            ProtectionEngine::check_access(&DECODER, &table, &req),
            Err(AccessFault::OwnershipViolation {
                addr: 0x1003,
                user: 6,
                owner: 4
            })
        );

        let narrow = MemoryRequest::read(0x1000, false, 6);
        assert_eq!(ProtectionEngine::check_access(&DECODER, &table, &narrow), Ok(()));
    }

    #[test]
    fn supervisor_write_leaves_table_untouched() {
        let mut table = OwnershipTable::new();
        table.claim(0x1000, UserId(4));
        ProtectionEngine::update_ownership(&mut table, &MemoryRequest::write(0x1000, 1, true, 0));
        assert_eq!(table.owner(0x1000), Some(UserId(4)));
        assert_eq!(table.owner(0x1001), None);
    }

    #[test]
    fn release_user_clears_only_touched_bytes() {
        let mut table = OwnershipTable::new();
        for addr in 0x1000..0x1008 {
            table.claim(addr, UserId(4));
        }
        ProtectionEngine::update_ownership(
            &mut table,
            &MemoryRequest::write(0x1002, 0, true, 255),
        );
        assert_eq!(table.owner(0x1001), Some(UserId(4)));
        for addr in 0x1002..0x1006 {
            assert_eq!(table.owner(addr), None);
        }
        assert_eq!(table.owner(0x1006), Some(UserId(4)));
    }
}
