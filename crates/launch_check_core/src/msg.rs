use std::fmt;

/// Monotonic token identifying one arming of a timer.
pub type TimerGeneration = u64;

/// The timers a reconciler schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Absolute liveness bound, armed once when the check starts.
    Timeout,
    /// One rendering frame; fires if native state never initializes.
    FirstFrame,
    /// Debounce after native state initialized with nothing further reported.
    InitGrace,
}

impl TimerKind {
    pub const ALL: [TimerKind; 3] = [
        TimerKind::Timeout,
        TimerKind::FirstFrame,
        TimerKind::InitGrace,
    ];
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::Timeout => write!(f, "timeout"),
            TimerKind::FirstFrame => write!(f, "first-frame"),
            TimerKind::InitGrace => write!(f, "init-grace"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The check was created; arms the overall timeout.
    Started,
    /// The update-check subsystem pushed a new snapshot of its flags.
    SignalsChanged(crate::SignalSnapshot),
    /// A timer previously requested through `Effect::ArmTimer` elapsed.
    TimerFired {
        timer: TimerKind,
        generation: TimerGeneration,
    },
    /// The caller tore the check down before it finished.
    Disposed,
    /// Carries no input; leaves the reconciler unchanged.
    NoOp,
}
