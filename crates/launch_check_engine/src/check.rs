use std::sync::Arc;

use check_logging::{check_debug, check_error, check_info, check_trace, check_warn};
use launch_check_core::{
    update, CheckState, CheckViewModel, CompletionOptions, Effect, Msg, Reconciler, SignalSnapshot,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::timers::{DueTimer, TimerTable};
use crate::{
    CheckReport, CheckSettings, EngineError, ReloadError, Reloader, SignalSource,
    SignalSubscription,
};

/// Caller-supplied notification that the launch may proceed.
pub type CompletionCallback = Box<dyn FnOnce(CompletionOptions) + Send>;

/// Handle to one running launch check.
///
/// Dropping the handle cancels the check; no callback fires afterwards.
pub struct CheckHandle {
    state_rx: watch::Receiver<CheckState>,
    view_rx: watch::Receiver<CheckViewModel>,
    task: JoinHandle<CheckReport>,
    guard: DropGuard,
}

impl CheckHandle {
    /// Starts a check on the current tokio runtime.
    ///
    /// `source` is subscribed once, before this returns. `on_complete` runs at most
    /// once, when the check reaches a terminal state other than `UpdateReady`.
    pub fn spawn<F>(
        source: &dyn SignalSource,
        reloader: Arc<dyn Reloader>,
        settings: CheckSettings,
        on_complete: F,
    ) -> Self
    where
        F: FnOnce(CompletionOptions) + Send + 'static,
    {
        let subscription = source.subscribe();
        let reconciler = Reconciler::new();
        let (state_tx, state_rx) = watch::channel(reconciler.check_state());
        let (view_tx, view_rx) = watch::channel(reconciler.view());
        let cancel = CancellationToken::new();

        let runner = CheckRunner {
            reconciler,
            subscription: Some(subscription),
            timers: TimerTable::default(),
            settings,
            reloader,
            on_complete: Some(Box::new(on_complete)),
            state_tx,
            view_tx,
            reload_error: None,
            started_at: Instant::now(),
        };
        let task = tokio::spawn(runner.run(cancel.clone()));

        Self {
            state_rx,
            view_rx,
            task,
            guard: cancel.drop_guard(),
        }
    }

    /// Reactive view of the current state.
    pub fn state(&self) -> watch::Receiver<CheckState> {
        self.state_rx.clone()
    }

    pub fn current_state(&self) -> CheckState {
        *self.state_rx.borrow()
    }

    /// Reactive view model, republished whenever the reconciler marks itself dirty.
    ///
    /// The snapshot it carries is the last one the reconciler evaluated.
    pub fn view(&self) -> watch::Receiver<CheckViewModel> {
        self.view_rx.clone()
    }

    /// Waits for the check to end on its own.
    pub async fn finished(self) -> Result<CheckReport, EngineError> {
        let Self { task, guard, .. } = self;
        let report = task.await?;
        drop(guard);
        Ok(report)
    }

    /// Cancels the check and waits for its task to wind down.
    pub async fn dispose(self) -> Result<CheckReport, EngineError> {
        let Self { task, guard, .. } = self;
        drop(guard);
        Ok(task.await?)
    }
}

enum Event {
    Cancelled,
    Snapshot(Option<SignalSnapshot>),
    Timer(DueTimer),
}

struct CheckRunner {
    reconciler: Reconciler,
    subscription: Option<SignalSubscription>,
    timers: TimerTable,
    settings: CheckSettings,
    reloader: Arc<dyn Reloader>,
    on_complete: Option<CompletionCallback>,
    state_tx: watch::Sender<CheckState>,
    view_tx: watch::Sender<CheckViewModel>,
    reload_error: Option<ReloadError>,
    started_at: Instant,
}

impl CheckRunner {
    async fn run(mut self, cancel: CancellationToken) -> CheckReport {
        self.apply(Msg::Started).await;

        while !self.reconciler.is_finished() {
            let due = self.timers.next_due();
            let event = tokio::select! {
                biased;
                () = cancel.cancelled() => Event::Cancelled,
                snapshot = next_snapshot(&mut self.subscription) => Event::Snapshot(snapshot),
                due = wait_for(due) => Event::Timer(due),
            };

            let msg = match event {
                Event::Cancelled => Msg::Disposed,
                Event::Snapshot(Some(snapshot)) => Msg::SignalsChanged(snapshot),
                Event::Snapshot(None) => {
                    check_warn!("signal source closed; waiting on timers only");
                    self.subscription = None;
                    continue;
                }
                Event::Timer(due) => {
                    self.timers.cancel(due.timer);
                    Msg::TimerFired {
                        timer: due.timer,
                        generation: due.generation,
                    }
                }
            };
            self.apply(msg).await;
        }

        self.subscription = None;
        if !self.timers.is_empty() {
            check_debug!("dropping outstanding timers");
            self.timers.clear();
        }
        self.into_report()
    }

    async fn apply(&mut self, msg: Msg) {
        check_trace!("launch check event {:?}", msg);
        let before = self.reconciler.check_state();
        let reconciler = std::mem::take(&mut self.reconciler);
        let (reconciler, effects) = update(reconciler, msg);
        self.reconciler = reconciler;

        let after = self.reconciler.check_state();
        if after != before {
            check_info!(
                "launch check {} -> {} after {:?}",
                before,
                after,
                self.started_at.elapsed()
            );
            self.state_tx.send_replace(after);
        }
        if self.reconciler.consume_dirty() {
            self.view_tx.send_replace(self.reconciler.view());
        }

        for effect in effects {
            self.run_effect(effect).await;
        }
    }

    async fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ArmTimer { timer, generation } => {
                let delay = self.settings.duration_for(timer);
                self.timers.arm(timer, generation, Instant::now() + delay);
                check_debug!("armed {} timer #{} for {:?}", timer, generation, delay);
            }
            Effect::CancelTimer { timer } => {
                if self.timers.cancel(timer) {
                    check_debug!("cancelled {} timer", timer);
                }
            }
            Effect::Complete(options) => match self.on_complete.take() {
                Some(on_complete) => {
                    check_info!("launch check complete (timed_out={})", options.timed_out);
                    on_complete(options);
                }
                None => check_warn!("launch check completion already delivered"),
            },
            Effect::Reload => {
                check_info!("update ready; requesting reload");
                if let Err(err) = self.reloader.reload().await {
                    check_error!("reload failed: {}", err);
                    self.reload_error = Some(err);
                }
            }
        }
    }

    fn into_report(self) -> CheckReport {
        let final_state = self.reconciler.check_state();
        let failure = self.reconciler.failure();
        let disposed = self.reconciler.is_disposed();
        CheckReport {
            final_state,
            timed_out: final_state == CheckState::Timeout,
            failure,
            trace: self.reconciler.into_trace(),
            reload_error: self.reload_error,
            disposed,
        }
    }
}

async fn next_snapshot(subscription: &mut Option<SignalSubscription>) -> Option<SignalSnapshot> {
    match subscription {
        Some(subscription) => subscription.next().await,
        None => std::future::pending().await,
    }
}

async fn wait_for(due: Option<DueTimer>) -> DueTimer {
    match due {
        Some(due) => {
            sleep_until(due.deadline).await;
            due
        }
        None => std::future::pending().await,
    }
}
