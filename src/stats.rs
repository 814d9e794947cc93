//! Simulation statistics collection and reporting.
//!
//! Tracks request counts, fault counts by class, backing store traffic and
//! where the controller spent its cycles.

use std::time::Instant;

use crate::common::{AccessFault, AccessType, FaultClass, MemoryRequest};
use crate::soc::memory::map::Region;

/// Simulation statistics structure tracking controller activity.
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub idle_cycles: u64,
    pub wait_cycles: u64,

    pub requests: u64,
    pub reads: u64,
    pub writes: u64,
    pub narrow_writes: u64,

    pub rom_accesses: u64,
    pub ram_accesses: u64,

    pub protocol_errors: u64,
    pub access_denied: u64,
    pub straddle_errors: u64,
    pub timeouts: u64,
}

impl Default for SimStats {
    /// Returns the default value.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            idle_cycles: 0,
            wait_cycles: 0,
            requests: 0,
            reads: 0,
            writes: 0,
            narrow_writes: 0,
            rom_accesses: 0,
            ram_accesses: 0,
            protocol_errors: 0,
            access_denied: 0,
            straddle_errors: 0,
            timeouts: 0,
        }
    }
}

impl SimStats {
    /// Total number of requests that completed with `error` set.
    pub fn errors(&self) -> u64 {
        self.protocol_errors + self.access_denied + self.straddle_errors + self.timeouts
    }

    /// Counts one enable pulse sent to the store serving `region`.
    pub fn record_store_access(&mut self, region: Region) {
        match region {
            Region::ReadOnly => self.rom_accesses += 1,
            Region::General => self.ram_accesses += 1,
        }
    }

    /// Counts a completed request and, if it failed, its fault class.
    pub fn record_completion(&mut self, request: &MemoryRequest, outcome: &Result<u32, AccessFault>) {
        self.requests += 1;
        match request.access_type() {
            Some(AccessType::Read) => self.reads += 1,
            Some(AccessType::Write) => {
                self.writes += 1;
                if !request.wide {
                    self.narrow_writes += 1;
                }
            }
            None => {}
        }

        if let Err(fault) = outcome {
            match fault.class() {
                FaultClass::Protocol => self.protocol_errors += 1,
                FaultClass::AccessDenied => self.access_denied += 1,
                FaultClass::Straddle => self.straddle_errors += 1,
                FaultClass::Timeout => self.timeouts += 1,
            }
        }
    }

    /// Prints a formatted summary of all simulation statistics.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let req = if self.requests == 0 { 1 } else { self.requests };
        let khz = (self.cycles as f64 / seconds) / 1000.0;
        let pct = |n: u64, of: u64| (n as f64 / of as f64) * 100.0;

        println!("\n==========================================================");
        println!("MEMORY CONTROLLER SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);
        println!("sim_requests             {}", self.requests);
        println!(
            "sim_cycles_per_request   {:.4}",
            self.cycles as f64 / req as f64
        );
        println!("----------------------------------------------------------");
        println!("CYCLE BREAKDOWN");
        println!(
            "  cycles.idle            {} ({:.2}%)",
            self.idle_cycles,
            pct(self.idle_cycles, cyc)
        );
        println!(
            "  cycles.wait            {} ({:.2}%)",
            self.wait_cycles,
            pct(self.wait_cycles, cyc)
        );
        println!("----------------------------------------------------------");
        println!("REQUEST MIX");
        println!(
            "  op.read                {} ({:.2}%)",
            self.reads,
            pct(self.reads, req)
        );
        println!(
            "  op.write               {} ({:.2}%)",
            self.writes,
            pct(self.writes, req)
        );
        println!(
            "  op.write_narrow        {} ({:.2}%)",
            self.narrow_writes,
            pct(self.narrow_writes, req)
        );
        println!("----------------------------------------------------------");
        println!("FAULTS");
        println!("  err.total              {}", self.errors());
        println!("  err.protocol           {}", self.protocol_errors);
        println!("  err.access_denied      {}", self.access_denied);
        println!("  err.straddle           {}", self.straddle_errors);
        println!("  err.timeout            {}", self.timeouts);
        println!("----------------------------------------------------------");
        println!("BACKING STORES");
        println!("  rom.accesses           {}", self.rom_accesses);
        println!("  ram.accesses           {}", self.ram_accesses);
        println!("==========================================================");
    }
}
