use std::time::Duration;

use launch_check_core::TimerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSettings {
    /// Upper bound on the whole check.
    pub timeout: Duration,
    /// How long to wait after native state initializes before assuming nothing follows.
    pub init_grace_delay: Duration,
    /// How long to wait for native state at all; roughly one rendered frame.
    pub first_frame_delay: Duration,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            init_grace_delay: Duration::from_millis(100),
            first_frame_delay: Duration::from_millis(16),
        }
    }
}

impl CheckSettings {
    pub fn duration_for(&self, timer: TimerKind) -> Duration {
        match timer {
            TimerKind::Timeout => self.timeout,
            TimerKind::FirstFrame => self.first_frame_delay,
            TimerKind::InitGrace => self.init_grace_delay,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_init_grace_delay(mut self, delay: Duration) -> Self {
        self.init_grace_delay = delay;
        self
    }

    pub fn with_first_frame_delay(mut self, delay: Duration) -> Self {
        self.first_frame_delay = delay;
        self
    }
}
