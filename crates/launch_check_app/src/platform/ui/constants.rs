// Text shown by the waiting view.
pub const ACTIVITY_INDICATOR: &str = "[...]";
pub const PREPARING_LABEL: &str = "Preparing the app";
pub const STATE_PREFIX: &str = "Current state: ";
pub const SIGNALS_PREFIX: &str = "Signals: ";
pub const FINISHED_PREFIX: &str = "Update check finished: ";
