use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use check_logging::check_info;
use launch_check_core::{SignalSnapshot, UpdateError};
use launch_check_engine::CheckSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PersistedSettings {
    timeout_ms: Option<u64>,
    init_grace_ms: Option<u64>,
    first_frame_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PersistedSignals {
    is_checking: bool,
    is_downloading: bool,
    is_update_pending: bool,
    is_update_available: bool,
    downloaded_update: Option<String>,
    check_error: Option<String>,
    download_error: Option<String>,
    time_since_last_check_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct PersistedStep {
    at_ms: u64,
    #[serde(default)]
    signals: PersistedSignals,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PersistedScenario {
    settings: PersistedSettings,
    steps: Vec<PersistedStep>,
    reload_fails: bool,
}

/// One snapshot the simulated update subsystem publishes at `at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScenarioStep {
    pub at: Duration,
    pub snapshot: SignalSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Scenario {
    pub settings: CheckSettings,
    /// Sorted by `at`.
    pub steps: Vec<ScenarioStep>,
    pub reload_fails: bool,
}

impl Scenario {
    /// Launch right after a programmatic reload: native state never reports.
    pub(crate) fn cold_start() -> Self {
        Self {
            settings: CheckSettings::default(),
            steps: Vec::new(),
            reload_fails: false,
        }
    }
}

pub(crate) fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    let scenario = parse_scenario(&content)
        .with_context(|| format!("failed to parse scenario {}", path.display()))?;
    check_info!(
        "Loaded scenario from {:?} with {} steps",
        path,
        scenario.steps.len()
    );
    Ok(scenario)
}

pub(crate) fn parse_scenario(text: &str) -> anyhow::Result<Scenario> {
    let persisted: PersistedScenario = ron::from_str(text)?;

    let mut steps: Vec<ScenarioStep> = persisted
        .steps
        .into_iter()
        .map(|step| ScenarioStep {
            at: Duration::from_millis(step.at_ms),
            snapshot: to_snapshot(step.signals),
        })
        .collect();
    steps.sort_by_key(|step| step.at);

    Ok(Scenario {
        settings: to_settings(&persisted.settings),
        steps,
        reload_fails: persisted.reload_fails,
    })
}

fn to_settings(persisted: &PersistedSettings) -> CheckSettings {
    let mut settings = CheckSettings::default();
    if let Some(ms) = persisted.timeout_ms {
        settings = settings.with_timeout(Duration::from_millis(ms));
    }
    if let Some(ms) = persisted.init_grace_ms {
        settings = settings.with_init_grace_delay(Duration::from_millis(ms));
    }
    if let Some(ms) = persisted.first_frame_ms {
        settings = settings.with_first_frame_delay(Duration::from_millis(ms));
    }
    settings
}

fn to_snapshot(signals: PersistedSignals) -> SignalSnapshot {
    SignalSnapshot {
        is_checking: signals.is_checking,
        is_downloading: signals.is_downloading,
        is_update_pending: signals.is_update_pending,
        is_update_available: signals.is_update_available,
        downloaded_update: signals.downloaded_update,
        check_error: signals.check_error.map(UpdateError::new),
        download_error: signals.download_error.map(UpdateError::new),
        time_since_last_check: signals.time_since_last_check_ms.map(Duration::from_millis),
    }
}
