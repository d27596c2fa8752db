use ferrous_socks_domain::{ConnectionError, ConnectionState};
use std::time::Duration;

/// Tracks the current step and when it was entered. A step that outlives the
/// timeout is reported as stuck.
#[derive(Debug, Clone)]
pub struct StepStuckGuard {
    step: ConnectionState,
    timeout: Duration,
    entered_at_ms: u64,
}

impl StepStuckGuard {
    pub fn new(timeout: Duration, now_ms: u64) -> Self {
        Self {
            step: ConnectionState::Initial,
            timeout,
            entered_at_ms: now_ms,
        }
    }

    pub fn step(&self) -> ConnectionState {
        self.step
    }

    /// Moves to `step` and restarts the window.
    pub fn set_step(&mut self, step: ConnectionState, now_ms: u64) {
        self.step = step;
        self.entered_at_ms = now_ms;
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.entered_at_ms)
    }

    pub fn check(&self, now_ms: u64) -> Result<(), ConnectionError> {
        if self.step.is_terminal() {
            return Ok(());
        }

        let elapsed_ms = self.elapsed_ms(now_ms);
        let limit_ms = self.timeout.as_millis() as u64;
        if elapsed_ms > limit_ms {
            return Err(ConnectionError::StepStuck {
                step: self.step.as_str(),
                elapsed_ms,
                limit_ms,
            });
        }

        Ok(())
    }
}
