//! Simulation harness: input loaders, the request driver and the cycle trace.

/// Request-driven simulation loop.
pub mod driver;

/// Request file and ROM content loaders.
pub mod loader;

/// JSON Lines cycle trace.
pub mod trace;

pub use driver::{run_simulation, SimResult};
pub use loader::{load_requests, load_rom_content, RequestTrace};
pub use trace::TraceWriter;
