//! Simulation Driver.
//!
//! Plays a list of requests against a [`System`] using the ready handshake:
//! the current request is held on the wires until the controller pulses
//! `ready`, and the next request is presented from the following cycle.

use std::io::{self, Write};

use tracing::{debug, info};

use super::trace::TraceWriter;
use crate::common::{MemoryRequest, Response};
use crate::soc::System;

/// Outcome of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimResult {
    /// Cycles simulated.
    pub cycles: u64,
    /// Completed requests that reported an error.
    pub errors: u64,
    /// Requests that completed.
    pub completed: usize,
    /// Completion response of each finished request, in order.
    pub outcomes: Vec<Response>,
    /// `true` if every request completed within the cycle budget.
    pub finished: bool,
}

/// Runs `requests` through `system` for at most `budget` cycles.
///
/// Stops early once every request has completed.
///
/// # Arguments
///
/// * `system` - System to drive
/// * `requests` - Requests to present, in order
/// * `budget` - Maximum number of cycles to simulate
/// * `trace` - Optional per-cycle trace sink
///
/// # Errors
///
/// Only trace write failures are reported; access faults are part of the
/// result.
pub fn run_simulation<W: Write>(
    system: &mut System,
    requests: &[MemoryRequest],
    budget: u64,
    mut trace: Option<&mut TraceWriter<W>>,
) -> io::Result<SimResult> {
    let mut result = SimResult::default();
    let mut next = 0;

    while result.cycles < budget && next < requests.len() {
        let input = requests[next];
        let response = system.tick(&input);
        result.cycles += 1;

        if let Some(trace) = trace.as_deref_mut() {
            trace.record(result.cycles, system.controller.output_state(), &input, &response)?;
        }

        if response.ready {
            if let Some(fault) = response.fault {
                debug!("request {} failed: {}", next, fault);
                result.errors += 1;
            }
            result.outcomes.push(response);
            next += 1;
        }
    }

    result.completed = next;
    result.finished = next == requests.len();
    info!(
        "simulation stopped after {} cycles, {}/{} requests completed",
        result.cycles,
        result.completed,
        requests.len()
    );
    Ok(result)
}
