use crate::{CheckState, TimerKind};

/// Which snapshot rule drove a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    UpdatePending,
    Failure,
    Activity,
    /// Every activity flag cleared after activity was observed.
    ActivitySettled,
    NativeInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    Snapshot(Rule),
    Timer(TimerKind),
}

/// One recorded state change, local to a single reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub seq: u64,
    pub from: CheckState,
    pub to: CheckState,
    pub cause: TransitionCause,
}
