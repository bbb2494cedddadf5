use launch_check_core::{CheckViewModel, SignalSnapshot};
use serde::Serialize;

use super::constants::{
    ACTIVITY_INDICATOR, FINISHED_PREFIX, PREPARING_LABEL, SIGNALS_PREFIX, STATE_PREFIX,
};
use crate::platform::effects::LaunchOutcome;

/// Flags as the waiting view shows them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignalsView {
    is_checking: bool,
    is_downloading: bool,
    is_update_pending: bool,
    is_update_available: bool,
}

impl From<&SignalSnapshot> for SignalsView {
    fn from(snapshot: &SignalSnapshot) -> Self {
        Self {
            is_checking: snapshot.is_checking,
            is_downloading: snapshot.is_downloading,
            is_update_pending: snapshot.is_update_pending,
            is_update_available: snapshot.is_update_available,
        }
    }
}

/// Lines for the current check; the waiting view while it is still waiting.
pub(crate) fn render(view: &CheckViewModel) -> Vec<String> {
    let state = view.state;
    if !view.waiting {
        return vec![format!("{FINISHED_PREFIX}{state}")];
    }

    let default = SignalSnapshot::default();
    let signals = SignalsView::from(view.last_snapshot.as_ref().unwrap_or(&default));
    let flags = serde_json::to_string(&signals).unwrap_or_else(|_| "{}".to_string());
    vec![
        format!("{ACTIVITY_INDICATOR} {PREPARING_LABEL}"),
        format!("{STATE_PREFIX}{state}"),
        format!("{SIGNALS_PREFIX}{flags}"),
    ]
}

pub(crate) fn render_outcome(outcome: &LaunchOutcome) -> String {
    match outcome {
        LaunchOutcome::Proceed {
            timed_out: true, ..
        } => "proceed (timed out)".to_string(),
        LaunchOutcome::Proceed { state, .. } => format!("proceed ({state})"),
        LaunchOutcome::Reload { error: None } => "reload".to_string(),
        LaunchOutcome::Reload { error: Some(err) } => format!("reload failed: {err}"),
    }
}
