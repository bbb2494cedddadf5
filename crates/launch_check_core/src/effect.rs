use crate::{TimerGeneration, TimerKind};

/// Options passed to the caller's completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionOptions {
    /// The check gave up waiting rather than observing an outcome.
    pub timed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Schedule `timer`, replacing any deadline already held for that kind.
    ArmTimer {
        timer: TimerKind,
        generation: TimerGeneration,
    },
    CancelTimer { timer: TimerKind },
    /// Notify the caller that the launch may proceed.
    Complete(CompletionOptions),
    /// Restart the application into the downloaded update.
    Reload,
}
