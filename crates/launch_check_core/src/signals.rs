use std::fmt;
use std::time::Duration;

/// Failure reported by the update-check subsystem for one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateError {
    pub message: String,
}

impl UpdateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for UpdateError {}

/// Which phase of the update check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePhase {
    /// Asking whether an update exists.
    Check,
    /// Fetching the update contents.
    Download,
}

impl fmt::Display for FailurePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePhase::Check => write!(f, "check"),
            FailurePhase::Download => write!(f, "download"),
        }
    }
}

/// One consistent set of flags sampled from the update-check subsystem.
///
/// The subsystem does not guarantee that flags flip atomically or in order, so
/// any combination may be observed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignalSnapshot {
    pub is_checking: bool,
    pub is_downloading: bool,
    /// An update was downloaded and takes effect on restart.
    pub is_update_pending: bool,
    pub is_update_available: bool,
    /// Identifier of an update that finished downloading, if any.
    pub downloaded_update: Option<String>,
    pub check_error: Option<UpdateError>,
    pub download_error: Option<UpdateError>,
    /// `None` until native state has been initialized at least once since process start.
    pub time_since_last_check: Option<Duration>,
}

impl SignalSnapshot {
    pub fn is_update_ready(&self) -> bool {
        self.is_update_pending || self.downloaded_update.is_some()
    }

    /// The failed phase, preferring the check phase when both report an error.
    pub fn failure(&self) -> Option<FailurePhase> {
        if self.check_error.is_some() {
            Some(FailurePhase::Check)
        } else if self.download_error.is_some() {
            Some(FailurePhase::Download)
        } else {
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_checking || self.is_downloading || self.is_update_available
    }

    pub fn native_state_initialized(&self) -> bool {
        self.time_since_last_check.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_prefers_check_phase() {
        let snapshot = SignalSnapshot {
            check_error: Some(UpdateError::new("manifest unreachable")),
            download_error: Some(UpdateError::new("asset truncated")),
            ..SignalSnapshot::default()
        };
        assert_eq!(snapshot.failure(), Some(FailurePhase::Check));
    }

    #[test]
    fn downloaded_marker_counts_as_ready() {
        let snapshot = SignalSnapshot {
            downloaded_update: Some("update-42".to_string()),
            ..SignalSnapshot::default()
        };
        assert!(snapshot.is_update_ready());
        assert!(!snapshot.is_active());
    }

    #[test]
    fn zero_time_since_last_check_is_initialized() {
        let snapshot = SignalSnapshot {
            time_since_last_check: Some(Duration::ZERO),
            ..SignalSnapshot::default()
        };
        assert!(snapshot.native_state_initialized());
        assert!(!SignalSnapshot::default().native_state_initialized());
    }
}
