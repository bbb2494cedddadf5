use crate::{CheckState, FailurePhase, SignalSnapshot, TimerKind};

/// What a waiting view needs to render one check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckViewModel {
    pub state: CheckState,
    /// The caller should keep showing its waiting view.
    pub waiting: bool,
    pub failure: Option<FailurePhase>,
    pub armed_timers: Vec<TimerKind>,
    pub transitions: usize,
    /// The last snapshot the reconciler evaluated.
    pub last_snapshot: Option<SignalSnapshot>,
}
