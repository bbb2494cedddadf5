use std::fmt;

use crate::view_model::CheckViewModel;
use crate::{
    CompletionOptions, Effect, FailurePhase, SignalSnapshot, TimerGeneration, TimerKind,
    TraceEntry, TransitionCause,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unknown,
    NativeStateInitialized,
    InProgress,
    NoEventsAfterInitialized,
    UpdateReady,
    NoUpdateAvailable,
    Error,
    Timeout,
}

impl CheckState {
    /// Terminal states never change again within one check.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CheckState::NoEventsAfterInitialized
                | CheckState::UpdateReady
                | CheckState::NoUpdateAvailable
                | CheckState::Error
                | CheckState::Timeout
        )
    }

    /// What the caller must be told on entering this state, if anything.
    fn dispatch(self) -> Option<Effect> {
        match self {
            CheckState::UpdateReady => Some(Effect::Reload),
            CheckState::NoUpdateAvailable
            | CheckState::Error
            | CheckState::NoEventsAfterInitialized => {
                Some(Effect::Complete(CompletionOptions::default()))
            }
            CheckState::Timeout => Some(Effect::Complete(CompletionOptions { timed_out: true })),
            CheckState::Unknown | CheckState::NativeStateInitialized | CheckState::InProgress => {
                None
            }
        }
    }

    /// Timer that only makes sense while in this state.
    fn owned_timer(self) -> Option<TimerKind> {
        match self {
            CheckState::Unknown => Some(TimerKind::FirstFrame),
            CheckState::NativeStateInitialized => Some(TimerKind::InitGrace),
            _ => None,
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckState::Unknown => "unknown",
            CheckState::NativeStateInitialized => "native state initialized",
            CheckState::InProgress => "in progress",
            CheckState::NoEventsAfterInitialized => "no events after initialized",
            CheckState::UpdateReady => "update ready",
            CheckState::NoUpdateAvailable => "no update available",
            CheckState::Error => "error",
            CheckState::Timeout => "timeout",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ArmedTimers {
    timeout: Option<TimerGeneration>,
    first_frame: Option<TimerGeneration>,
    init_grace: Option<TimerGeneration>,
}

impl ArmedTimers {
    fn slot(&mut self, timer: TimerKind) -> &mut Option<TimerGeneration> {
        match timer {
            TimerKind::Timeout => &mut self.timeout,
            TimerKind::FirstFrame => &mut self.first_frame,
            TimerKind::InitGrace => &mut self.init_grace,
        }
    }

    fn get(&self, timer: TimerKind) -> Option<TimerGeneration> {
        match timer {
            TimerKind::Timeout => self.timeout,
            TimerKind::FirstFrame => self.first_frame,
            TimerKind::InitGrace => self.init_grace,
        }
    }
}

/// State of one launch-time update check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciler {
    state: CheckState,
    started: bool,
    disposed: bool,
    dispatched: bool,
    timers: ArmedTimers,
    next_generation: TimerGeneration,
    last_snapshot: Option<SignalSnapshot>,
    failure: Option<FailurePhase>,
    trace: Vec<TraceEntry>,
    dirty: bool,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_state(&self) -> CheckState {
        self.state
    }

    pub fn failure(&self) -> Option<FailurePhase> {
        self.failure
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<TraceEntry> {
        self.trace
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// No further message can change this reconciler.
    pub fn is_finished(&self) -> bool {
        self.disposed || self.state.is_terminal()
    }

    pub fn armed_generation(&self, timer: TimerKind) -> Option<TimerGeneration> {
        self.timers.get(timer)
    }

    pub fn view(&self) -> CheckViewModel {
        CheckViewModel {
            state: self.state,
            waiting: !self.is_finished(),
            failure: self.failure,
            armed_timers: TimerKind::ALL
                .into_iter()
                .filter(|timer| self.timers.get(*timer).is_some())
                .collect(),
            transitions: self.trace.len(),
            last_snapshot: self.last_snapshot.clone(),
        }
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_started(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    /// Stores `snapshot`, returning `false` when it repeats the previous one.
    pub(crate) fn record_snapshot(&mut self, snapshot: &SignalSnapshot) -> bool {
        if self.last_snapshot.as_ref() == Some(snapshot) {
            return false;
        }
        self.last_snapshot = Some(snapshot.clone());
        self.dirty = true;
        true
    }

    pub(crate) fn record_failure(&mut self, phase: FailurePhase) {
        self.failure = Some(phase);
    }

    pub(crate) fn arm(&mut self, timer: TimerKind) -> Effect {
        self.next_generation += 1;
        let generation = self.next_generation;
        *self.timers.slot(timer) = Some(generation);
        Effect::ArmTimer { timer, generation }
    }

    pub(crate) fn disarm(&mut self, timer: TimerKind) -> Option<Effect> {
        self.timers
            .slot(timer)
            .take()
            .map(|_| Effect::CancelTimer { timer })
    }

    pub(crate) fn disarm_all(&mut self) -> Vec<Effect> {
        TimerKind::ALL
            .into_iter()
            .filter_map(|timer| self.disarm(timer))
            .collect()
    }

    /// Consumes the armed slot if `generation` is the live one for `timer`.
    pub(crate) fn take_fired(&mut self, timer: TimerKind, generation: TimerGeneration) -> bool {
        let slot = self.timers.slot(timer);
        if *slot == Some(generation) {
            *slot = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn dispose(&mut self) -> Vec<Effect> {
        self.disposed = true;
        self.dirty = true;
        self.disarm_all()
    }

    /// Moves to `to`, cancelling superseded timers and dispatching terminal effects.
    pub(crate) fn transition(&mut self, to: CheckState, cause: TransitionCause) -> Vec<Effect> {
        let from = self.state;
        if from == to || from.is_terminal() {
            return Vec::new();
        }

        self.state = to;
        self.dirty = true;
        self.trace.push(TraceEntry {
            seq: self.trace.len() as u64 + 1,
            from,
            to,
            cause,
        });

        let mut effects = Vec::new();
        if to.is_terminal() {
            effects.extend(self.disarm_all());
            if !self.dispatched {
                self.dispatched = true;
                effects.extend(to.dispatch());
            }
        } else if let Some(timer) = from.owned_timer() {
            effects.extend(self.disarm(timer));
        }
        effects
    }
}
