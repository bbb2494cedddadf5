use launch_check_core::{CheckState, FailurePhase, TraceEntry};
use thiserror::Error;

use crate::ReloadError;

/// Outcome of one launch check, returned when its task ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub final_state: CheckState,
    pub timed_out: bool,
    pub failure: Option<FailurePhase>,
    pub trace: Vec<TraceEntry>,
    pub reload_error: Option<ReloadError>,
    /// The check was torn down before reaching a terminal state.
    pub disposed: bool,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("launch check task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(err: tokio::task::JoinError) -> Self {
        EngineError::TaskFailed(err.to_string())
    }
}
