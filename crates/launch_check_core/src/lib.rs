//! Launch check core: pure update-check reconciler and view-model helpers.
mod effect;
mod msg;
mod signals;
mod state;
mod trace;
mod update;
mod view_model;

pub use effect::{CompletionOptions, Effect};
pub use msg::{Msg, TimerGeneration, TimerKind};
pub use signals::{FailurePhase, SignalSnapshot, UpdateError};
pub use state::{CheckState, Reconciler};
pub use trace::{Rule, TraceEntry, TransitionCause};
pub use update::update;
pub use view_model::CheckViewModel;
