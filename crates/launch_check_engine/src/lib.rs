//! Launch check engine: drives the reconciler from live signals and timers.
mod check;
mod reload;
mod settings;
mod source;
mod timers;
mod types;

pub use check::{CheckHandle, CompletionCallback};
pub use reload::{ReloadError, Reloader};
pub use settings::CheckSettings;
pub use source::{ChannelSignalSource, SignalSource, SignalSubscription};
pub use types::{CheckReport, EngineError};
