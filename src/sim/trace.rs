//! Cycle trace writer.
//!
//! Emits one JSON object per simulated cycle (JSON Lines) describing the
//! request wires as presented and the controller outputs for that cycle.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::common::{AccessFault, MemoryRequest, Response};
use crate::soc::memory::ControllerState;

#[derive(Serialize)]
struct TraceRecord<'a> {
    cycle: u64,
    state: ControllerState,
    request: &'a MemoryRequest,
    ready: bool,
    error: bool,
    rdata: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault: Option<AccessFault>,
}

/// JSON Lines writer for per-cycle records.
pub struct TraceWriter<W: Write> {
    out: W,
    records: u64,
}

impl TraceWriter<BufWriter<File>> {
    /// Creates (or truncates) the trace file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> TraceWriter<W> {
    /// Wraps an arbitrary writer.
    pub fn new(out: W) -> Self {
        Self { out, records: 0 }
    }

    /// Number of records written so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Appends the record for one cycle.
    ///
    /// # Arguments
    ///
    /// * `cycle` - Cycle number, starting at 1
    /// * `state` - Controller state that drove this cycle's outputs
    /// * `request` - Request wires presented during the cycle
    /// * `response` - Controller outputs for the cycle
    pub fn record(
        &mut self,
        cycle: u64,
        state: ControllerState,
        request: &MemoryRequest,
        response: &Response,
    ) -> io::Result<()> {
        let record = TraceRecord {
            cycle,
            state,
            request,
            ready: response.ready,
            error: response.error,
            rdata: response.rdata,
            fault: response.fault,
        };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::TraceWriter;
    use crate::common::{MemoryRequest, Response};
    use crate::soc::memory::ControllerState;

    #[test]
    fn writes_one_json_object_per_line() {
        let mut trace = TraceWriter::new(Vec::new());
        let req = MemoryRequest::read(0x40, true, 3);
        trace
            .record(1, ControllerState::WaitBackingStore, &req, &Response::busy())
            .unwrap();
        trace
            .record(2, ControllerState::Idle, &req, &Response::done(7))
            .unwrap();
        assert_eq!(trace.records(), 2);

        let out = String::from_utf8(trace.finish().unwrap()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["cycle"], 1);
        assert_eq!(lines[0]["state"], "WaitBackingStore");
        assert_eq!(lines[0]["request"]["address"], 0x40);
        assert_eq!(lines[1]["ready"], true);
        assert_eq!(lines[1]["rdata"], 7);
        assert!(lines[1].get("fault").is_none());
    }
}
