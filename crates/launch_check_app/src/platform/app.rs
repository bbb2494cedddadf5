use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use check_logging::{check_debug, check_info};
use launch_check_core::{CheckViewModel, CompletionOptions};
use launch_check_engine::{ChannelSignalSource, CheckHandle};
use tokio::sync::{oneshot, watch};
use tokio::time::{sleep_until, Instant};

use super::effects::{ConsoleReloader, LaunchOutcome};
use super::logging::{self, LogDestination};
use super::scenario::{self, Scenario, ScenarioStep};
use super::ui;

const USAGE: &str = "usage: launch_check_app [scenario.ron] [--log-file]";

#[derive(Debug, Default, PartialEq, Eq)]
struct LaunchOptions {
    scenario_path: Option<PathBuf>,
    log_file: bool,
}

impl LaunchOptions {
    fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut options = LaunchOptions::default();
        for arg in args {
            match arg.as_str() {
                "--log-file" => options.log_file = true,
                flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
                path if options.scenario_path.is_none() => {
                    options.scenario_path = Some(PathBuf::from(path));
                }
                extra => bail!("unexpected argument {extra}\n{USAGE}"),
            }
        }
        Ok(options)
    }
}

pub fn run_app(args: impl IntoIterator<Item = String>) -> anyhow::Result<()> {
    let options = LaunchOptions::parse(args)?;

    let destination = if options.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, logging::level_from_env());

    let scenario = match &options.scenario_path {
        Some(path) => scenario::load_scenario(path)?,
        None => Scenario::cold_start(),
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let outcome = runtime.block_on(run_scenario(scenario))?;
    println!("{}", ui::render::render_outcome(&outcome));
    Ok(())
}

async fn run_scenario(scenario: Scenario) -> anyhow::Result<LaunchOutcome> {
    let source = ChannelSignalSource::new();
    let reloader = Arc::new(ConsoleReloader::new(scenario.reload_fails));
    let (completion_tx, completion_rx) = oneshot::channel();

    let on_complete = move |options: CompletionOptions| {
        let _ = completion_tx.send(options);
    };
    let handle = CheckHandle::spawn(&source, reloader.clone(), scenario.settings, on_complete);
    let renderer = tokio::spawn(render_views(handle.view()));
    let player = tokio::spawn(play_steps(source.clone(), scenario.steps));

    let report = handle.finished().await?;
    player.abort();
    renderer.await.context("render task failed")?;

    // The sender is dropped unsent on the reload path.
    let completion = completion_rx.await.ok();
    check_info!(
        "Launch check ended in {} after {} transitions ({} reload requests)",
        report.final_state,
        report.trace.len(),
        reloader.requests()
    );
    Ok(LaunchOutcome::from_report(&report, completion))
}

async fn render_views(mut views: watch::Receiver<CheckViewModel>) {
    loop {
        let view = views.borrow_and_update().clone();
        for line in ui::render::render(&view) {
            println!("{line}");
        }
        if views.changed().await.is_err() {
            break;
        }
    }
}

async fn play_steps(source: ChannelSignalSource, steps: Vec<ScenarioStep>) {
    let started = Instant::now();
    for step in steps {
        // Zero-delay steps publish without touching the timer wheel.
        if !step.at.is_zero() {
            sleep_until(started + step.at).await;
        }
        check_debug!("Publishing scenario step at {:?}", step.at);
        source.publish(step.snapshot);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use launch_check_core::{CheckState, SignalSnapshot};
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parse_accepts_path_and_log_flag() {
        let options = LaunchOptions::parse(args(&["demo.ron", "--log-file"])).expect("valid args");
        assert_eq!(
            options,
            LaunchOptions {
                scenario_path: Some(PathBuf::from("demo.ron")),
                log_file: true,
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_flag_and_extra_path() {
        assert!(LaunchOptions::parse(args(&["--verbose"])).is_err());
        assert!(LaunchOptions::parse(args(&["a.ron", "b.ron"])).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cold_start_proceeds_without_timeout() {
        let outcome = run_scenario(Scenario::cold_start()).await.expect("scenario runs");
        assert_eq!(
            outcome,
            LaunchOutcome::Proceed {
                state: CheckState::NoEventsAfterInitialized,
                timed_out: false,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_pending_update_reloads() {
        let mut scenario = Scenario::cold_start();
        scenario.steps = vec![
            ScenarioStep {
                at: Duration::ZERO,
                snapshot: SignalSnapshot {
                    is_checking: true,
                    time_since_last_check: Some(Duration::ZERO),
                    ..SignalSnapshot::default()
                },
            },
            ScenarioStep {
                at: Duration::from_millis(800),
                snapshot: SignalSnapshot {
                    is_update_pending: true,
                    ..SignalSnapshot::default()
                },
            },
        ];

        let outcome = run_scenario(scenario).await.expect("scenario runs");
        assert_eq!(outcome, LaunchOutcome::Reload { error: None });
    }
}
