use crate::{
    CheckState, Effect, Msg, Reconciler, Rule, SignalSnapshot, TimerGeneration, TimerKind,
    TransitionCause,
};

/// Pure update function: applies a message to the reconciler and returns any effects.
pub fn update(mut state: Reconciler, msg: Msg) -> (Reconciler, Vec<Effect>) {
    if state.is_disposed() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Started => {
            if !state.mark_started() || state.check_state().is_terminal() {
                return (state, Vec::new());
            }
            let mut effects = vec![state.arm(TimerKind::Timeout)];
            // Snapshots delivered ahead of `Started` already placed the machine.
            if state.check_state() == CheckState::Unknown {
                effects.push(state.arm(TimerKind::FirstFrame));
            }
            effects
        }
        Msg::SignalsChanged(snapshot) => {
            if state.check_state().is_terminal() || !state.record_snapshot(&snapshot) {
                return (state, Vec::new());
            }
            evaluate(&mut state, &snapshot)
        }
        Msg::TimerFired { timer, generation } => timer_fired(&mut state, timer, generation),
        Msg::Disposed => state.dispose(),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Applies the snapshot rules in priority order; the first match wins.
fn evaluate(state: &mut Reconciler, snapshot: &SignalSnapshot) -> Vec<Effect> {
    let current = state.check_state();

    if snapshot.is_update_ready() {
        state.transition(CheckState::UpdateReady, TransitionCause::Snapshot(Rule::UpdatePending))
    } else if let Some(phase) = snapshot.failure() {
        state.record_failure(phase);
        state.transition(CheckState::Error, TransitionCause::Snapshot(Rule::Failure))
    } else if snapshot.is_active() {
        state.transition(CheckState::InProgress, TransitionCause::Snapshot(Rule::Activity))
    } else if current == CheckState::InProgress {
        // All-clear is only trusted once activity has actually been seen.
        state.transition(
            CheckState::NoUpdateAvailable,
            TransitionCause::Snapshot(Rule::ActivitySettled),
        )
    } else if snapshot.native_state_initialized() && current == CheckState::Unknown {
        let mut effects = state.transition(
            CheckState::NativeStateInitialized,
            TransitionCause::Snapshot(Rule::NativeInitialized),
        );
        effects.push(state.arm(TimerKind::InitGrace));
        effects
    } else if current == CheckState::Unknown {
        vec![state.arm(TimerKind::FirstFrame)]
    } else {
        // NativeStateInitialized keeps waiting on its grace timer.
        Vec::new()
    }
}

fn timer_fired(
    state: &mut Reconciler,
    timer: TimerKind,
    generation: TimerGeneration,
) -> Vec<Effect> {
    if !state.take_fired(timer, generation) {
        return Vec::new();
    }

    let current = state.check_state();
    let cause = TransitionCause::Timer(timer);
    match timer {
        TimerKind::Timeout => state.transition(CheckState::Timeout, cause),
        TimerKind::FirstFrame if current == CheckState::Unknown => {
            state.transition(CheckState::NoEventsAfterInitialized, cause)
        }
        TimerKind::InitGrace if current == CheckState::NativeStateInitialized => {
            state.transition(CheckState::NoEventsAfterInitialized, cause)
        }
        TimerKind::FirstFrame | TimerKind::InitGrace => Vec::new(),
    }
}
