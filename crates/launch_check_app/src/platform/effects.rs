use std::sync::atomic::{AtomicUsize, Ordering};

use check_logging::{check_info, check_warn};
use launch_check_core::{CheckState, CompletionOptions};
use launch_check_engine::{CheckReport, ReloadError, Reloader};

/// Stands in for the platform restart primitive.
///
/// A real host never returns from a successful reload; here the request is recorded
/// so the simulator can report it.
pub struct ConsoleReloader {
    fail: bool,
    requests: AtomicUsize,
}

impl ConsoleReloader {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Reloader for ConsoleReloader {
    async fn reload(&self) -> Result<(), ReloadError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            check_warn!("Reload requested but unavailable in this environment");
            return Err(ReloadError::Unavailable);
        }
        check_info!("Reloading application into downloaded update");
        Ok(())
    }
}

/// What the launch sequence does once the check is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Proceed {
        state: CheckState,
        timed_out: bool,
    },
    Reload {
        error: Option<String>,
    },
}

impl LaunchOutcome {
    pub fn from_report(report: &CheckReport, completion: Option<CompletionOptions>) -> Self {
        if report.final_state == CheckState::UpdateReady {
            return LaunchOutcome::Reload {
                error: report.reload_error.as_ref().map(ToString::to_string),
            };
        }
        // The report stands in when the completion was never delivered.
        let timed_out = completion.map_or(report.timed_out, |options| options.timed_out);
        LaunchOutcome::Proceed {
            state: report.final_state,
            timed_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(final_state: CheckState) -> CheckReport {
        CheckReport {
            final_state,
            timed_out: final_state == CheckState::Timeout,
            failure: None,
            trace: Vec::new(),
            reload_error: None,
            disposed: false,
        }
    }

    #[test]
    fn update_ready_maps_to_reload() {
        let mut ready = report(CheckState::UpdateReady);
        assert_eq!(
            LaunchOutcome::from_report(&ready, None),
            LaunchOutcome::Reload { error: None }
        );

        ready.reload_error = Some(ReloadError::Unavailable);
        assert_eq!(
            LaunchOutcome::from_report(&ready, None),
            LaunchOutcome::Reload {
                error: Some("reload is not available in this environment".to_string())
            }
        );
    }

    #[test]
    fn completion_carries_timeout_flag() {
        let outcome = LaunchOutcome::from_report(
            &report(CheckState::Timeout),
            Some(CompletionOptions { timed_out: true }),
        );
        assert_eq!(
            outcome,
            LaunchOutcome::Proceed {
                state: CheckState::Timeout,
                timed_out: true
            }
        );
    }

    #[test]
    fn missing_completion_falls_back_to_report() {
        assert_eq!(
            LaunchOutcome::from_report(&report(CheckState::Timeout), None),
            LaunchOutcome::Proceed {
                state: CheckState::Timeout,
                timed_out: true
            }
        );
    }

    #[tokio::test]
    async fn failing_reloader_counts_requests() {
        let reloader = ConsoleReloader::new(true);
        assert_eq!(reloader.reload().await, Err(ReloadError::Unavailable));
        assert_eq!(reloader.requests(), 1);
    }
}
