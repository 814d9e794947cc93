//! Request Dispatcher.
//!
//! This module implements the memory controller state machine. Each cycle it
//! samples the request signals, and for a new request it decodes the address,
//! runs the protection check, drives the selected backing store and waits
//! for its `ready`, packing narrow writes into a read-modify-write sequence.
//! Exactly one request is in flight at a time.

use std::mem;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::map::{AddressDecoder, Region};
use super::ownership::OwnershipTable;
use super::protection::ProtectionEngine;
use crate::common::{AccessFault, MemoryRequest, Response, BYTE_MASK};
use crate::soc::interconnect::Interconnect;
use crate::soc::traits::StoreCommand;
use crate::stats::SimStats;

/// State of the request dispatcher.
///
/// `Decode` and `ProtectCheck` are passed through within the cycle that
/// accepts a request, so between cycles the dispatcher only rests in
/// `Idle` or `WaitBackingStore`. `Complete` and `ProtocolError` are the
/// states whose outputs are on the wires when `ready` is high; see
/// [`MemoryController::output_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ControllerState {
    /// Waiting for a request.
    Idle,
    /// Checking the request protocol and classifying the address.
    Decode,
    /// Running the protection engine.
    ProtectCheck,
    /// Waiting for the selected backing store to assert `ready`.
    WaitBackingStore,
    /// Request finished; outputs are valid.
    Complete,
    /// Read and write were asserted together; outputs are valid.
    ProtocolError,
}

/// Store access currently being waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Plain read, result goes to `rdata`.
    Read,
    /// Read of the word a narrow write will be merged into.
    ReadForModify,
    /// Final word write.
    Write,
}

#[derive(Debug, Clone, Copy)]
struct PendingAccess {
    region: Region,
    phase: Phase,
    issued_at: u64,
}

/// Memory controller with ROM routing and ownership protection.
///
/// Owns the ownership table and the interconnect to both stores; nothing
/// else mutates either.
pub struct MemoryController {
    decoder: AddressDecoder,
    ownership: OwnershipTable,
    bus: Interconnect,
    state: ControllerState,
    /// State that drove the outputs of the last cycle.
    output_state: ControllerState,
    /// Request latched when leaving `Idle`.
    latched: MemoryRequest,
    region: Region,
    pending: Option<PendingAccess>,
    outcome: Result<u32, AccessFault>,
    /// Maximum cycles to wait for a store; zero waits forever.
    wait_timeout: u64,
    cycle: u64,
    /// Counters collected while running.
    pub stats: SimStats,
}

impl MemoryController {
    /// Creates an idle controller.
    ///
    /// # Arguments
    ///
    /// * `decoder` - Address decoder holding the ROM size
    /// * `ownership` - Initial (normally empty) ownership table
    /// * `bus` - Interconnect to the ROM and RAM stores
    pub fn new(decoder: AddressDecoder, ownership: OwnershipTable, bus: Interconnect) -> Self {
        Self {
            decoder,
            ownership,
            bus,
            state: ControllerState::Idle,
            output_state: ControllerState::Idle,
            latched: MemoryRequest::default(),
            region: Region::General,
            pending: None,
            outcome: Ok(0),
            wait_timeout: 0,
            cycle: 0,
            stats: SimStats::default(),
        }
    }

    /// Bounds every store wait to `cycles`; zero disables the bound.
    pub fn with_wait_timeout(mut self, cycles: u64) -> Self {
        self.wait_timeout = cycles;
        self
    }

    /// Current state machine state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// State that produced the outputs of the most recent cycle.
    ///
    /// Equal to [`MemoryController::state`] while busy or idle; in the cycle
    /// a request completes it is `Complete` or `ProtocolError`.
    pub fn output_state(&self) -> ControllerState {
        self.output_state
    }

    /// Returns `true` when the next cycle would accept a new request.
    pub fn is_idle(&self) -> bool {
        self.state == ControllerState::Idle
    }

    /// Number of cycles simulated so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Address decoder in use.
    pub fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Current ownership records.
    pub fn ownership(&self) -> &OwnershipTable {
        &self.ownership
    }

    /// Interconnect to the backing stores.
    pub fn bus(&self) -> &Interconnect {
        &self.bus
    }

    /// Mutable interconnect, for back-door preloading before simulation.
    pub fn bus_mut(&mut self) -> &mut Interconnect {
        &mut self.bus
    }

    /// Reads the little-endian word at `addr` through the back doors.
    ///
    /// Each byte comes from the store that owns it, so a word spanning the
    /// ROM boundary combines both stores.
    pub fn peek_u32(&self, addr: u32) -> u32 {
        u32::from_le_bytes([0, 1, 2, 3].map(|i| self.peek_u8(addr.wrapping_add(i))))
    }

    /// Reads the byte at `addr` through the back door of the owning store.
    pub fn peek_u8(&self, addr: u32) -> u8 {
        self.bus.store(self.decoder.classify(addr)).peek_u8(addr)
    }

    /// Advances the controller by one clock cycle.
    ///
    /// `input` is the request bundle currently on the input wires. It is
    /// only sampled while the controller is idle; the driver must hold it
    /// until `ready` is returned and change it before the next cycle.
    ///
    /// # Returns
    ///
    /// The output signals for this cycle. `ready` is high exactly in the
    /// cycle a request completes.
    pub fn tick(&mut self, input: &MemoryRequest) -> Response {
        self.cycle += 1;
        self.stats.cycles += 1;
        self.bus.tick();

        loop {
            match self.state {
                ControllerState::Idle => {
                    if !input.is_present() {
                        self.stats.idle_cycles += 1;
                        self.output_state = self.state;
                        return Response::busy();
                    }
                    self.latched = *input;
                    self.enter(ControllerState::Decode);
                }
                ControllerState::Decode => self.decode(),
                ControllerState::ProtectCheck => self.protect_check(),
                ControllerState::WaitBackingStore => {
                    if !self.service_pending() {
                        self.stats.wait_cycles += 1;
                        self.output_state = self.state;
                        return Response::busy();
                    }
                }
                ControllerState::Complete | ControllerState::ProtocolError => {
                    return self.finish();
                }
            }
        }
    }

    fn enter(&mut self, next: ControllerState) {
        trace!("cycle {}: {:?} -> {:?}", self.cycle, self.state, next);
        self.state = next;
    }

    fn reject(&mut self, fault: AccessFault) {
        self.outcome = Err(fault);
        self.enter(ControllerState::Complete);
    }

    fn decode(&mut self) {
        let req = self.latched;

        if req.is_protocol_violation() {
            warn!(
                "simultaneous read and write access on {:#010x} is not allowed",
                req.address
            );
            self.outcome = Err(AccessFault::ProtocolViolation { addr: req.address });
            self.enter(ControllerState::ProtocolError);
            return;
        }

        match self.decoder.classify_span(req.address, req.width()) {
            Ok(region) => {
                self.region = region;
                self.enter(ControllerState::ProtectCheck);
            }
            Err(fault) => {
                warn!("{fault}");
                self.reject(fault);
            }
        }
    }

    fn protect_check(&mut self) {
        let req = self.latched;

        if let Err(fault) = ProtectionEngine::check_access(&self.decoder, &self.ownership, &req) {
            self.reject(fault);
            return;
        }

        let phase = match (req.write, req.wide) {
            (false, _) => Phase::Read,
            (true, true) => Phase::Write,
            (true, false) => Phase::ReadForModify,
        };
        self.begin_phase(phase, req.write_data);
        self.enter(ControllerState::WaitBackingStore);
    }

    /// Drives the store serving the latched region for `phase`.
    fn begin_phase(&mut self, phase: Phase, data: u32) {
        let addr = self.latched.address;
        let command = match phase {
            Phase::Read | Phase::ReadForModify => StoreCommand::Read { addr },
            Phase::Write => StoreCommand::Write { addr, data },
        };
        debug!(
            "cycle {}: issuing {:?} to {}",
            self.cycle, command, self.region
        );
        self.bus.store_mut(self.region).issue(command);
        self.stats.record_store_access(self.region);
        self.pending = Some(PendingAccess {
            region: self.region,
            phase,
            issued_at: self.cycle,
        });
    }

    /// Polls the pending store access.
    ///
    /// Returns `true` once the request has an outcome, `false` while still
    /// waiting.
    fn service_pending(&mut self) -> bool {
        loop {
            let Some(pending) = self.pending else {
                self.enter(ControllerState::Complete);
                return true;
            };

            let store = self.bus.store_mut(pending.region);
            let Some(data) = store.complete() else {
                let waited = self.cycle - pending.issued_at;
                if self.wait_timeout > 0 && waited >= self.wait_timeout {
                    store.cancel();
                    self.pending = None;
                    let fault = AccessFault::Timeout {
                        region: pending.region,
                        cycles: waited,
                    };
                    warn!("{fault}");
                    self.reject(fault);
                    return true;
                }
                return false;
            };

            let req = self.latched;
            match pending.phase {
                Phase::Read => {
                    let rdata = if req.wide { data } else { data & BYTE_MASK };
                    self.pending = None;
                    self.outcome = Ok(rdata);
                    self.enter(ControllerState::Complete);
                    return true;
                }
                Phase::ReadForModify => {
                    let word = (data & !BYTE_MASK) | (req.write_data & BYTE_MASK);
                    trace!("merged byte {:#04x} into word {:#010x}", req.write_data & BYTE_MASK, word);
                    self.begin_phase(Phase::Write, word);
                }
                Phase::Write => {
                    ProtectionEngine::update_ownership(&mut self.ownership, &req);
                    self.pending = None;
                    self.outcome = Ok(0);
                    self.enter(ControllerState::Complete);
                    return true;
                }
            }
        }
    }

    fn finish(&mut self) -> Response {
        self.output_state = self.state;
        let outcome = mem::replace(&mut self.outcome, Ok(0));
        self.stats.record_completion(&self.latched, &outcome);
        self.latched = MemoryRequest::default();
        self.enter(ControllerState::Idle);
        Response::from(outcome)
    }
}
