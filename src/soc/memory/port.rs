//! Fixed-latency store port.
//!
//! Models the enable/ready handshake of a backing store: a command issued
//! at cycle `t` is ready at cycle `t + latency`, with `ready` held low in
//! between.

use crate::soc::traits::StoreCommand;

/// Handshake state of a store with a fixed service latency.
#[derive(Debug, Clone)]
pub struct LatencyPort {
    /// Fixed latency per access.
    latency: u64,
    pending: Option<StoreCommand>,
    remaining: u64,
}

impl LatencyPort {
    /// Creates an idle port.
    ///
    /// # Arguments
    ///
    /// * `latency` - The fixed latency in cycles.
    pub fn new(latency: u64) -> Self {
        Self {
            latency,
            pending: None,
            remaining: 0,
        }
    }

    /// Returns the configured latency.
    pub fn latency(&self) -> u64 {
        self.latency
    }

    /// Latches `command` and starts the countdown.
    pub fn begin(&mut self, command: StoreCommand) {
        self.pending = Some(command);
        self.remaining = self.latency;
    }

    /// Counts down one cycle of the in-flight command.
    pub fn tick(&mut self) {
        if self.pending.is_some() {
            self.remaining = self.remaining.saturating_sub(1);
        }
    }

    /// Current state of the `ready` output.
    pub fn is_ready(&self) -> bool {
        self.pending.is_some() && self.remaining == 0
    }

    /// Returns `true` while a command is latched.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the latched command once `ready` is asserted.
    pub fn take_ready(&mut self) -> Option<StoreCommand> {
        if self.is_ready() {
            self.pending.take()
        } else {
            None
        }
    }

    /// Drops the latched command.
    pub fn clear(&mut self) {
        self.pending = None;
        self.remaining = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::LatencyPort;
    use crate::soc::traits::StoreCommand;

    #[test]
    fn ready_after_exactly_latency_ticks() {
        let mut port = LatencyPort::new(3);
        port.begin(StoreCommand::Read { addr: 0 });
        for _ in 0..3 {
            assert!(!port.is_ready());
            port.tick();
        }
        assert!(port.is_ready());
        assert_eq!(port.take_ready(), Some(StoreCommand::Read { addr: 0 }));
        assert!(!port.is_busy());
    }

    #[test]
    fn zero_latency_is_ready_immediately() {
        let mut port = LatencyPort::new(0);
        port.begin(StoreCommand::Write { addr: 4, data: 1 });
        assert!(port.is_ready());
    }

    #[test]
    fn idle_port_never_ready() {
        let mut port = LatencyPort::new(0);
        port.tick();
        assert!(!port.is_ready());
        assert_eq!(port.take_ready(), None);
    }
}
