use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReloadError {
    #[error("reload is not available in this environment")]
    Unavailable,
    #[error("reload failed: {0}")]
    Failed(String),
}

/// Restarts the application into a downloaded update.
///
/// Implementations normally never return on success because the process is replaced.
#[async_trait::async_trait]
pub trait Reloader: Send + Sync {
    async fn reload(&self) -> Result<(), ReloadError>;
}
