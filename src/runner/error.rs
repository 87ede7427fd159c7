//! Runner error types.

/// Runner error type.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("watcher is already running")]
    AlreadyRunning,
    #[error("fetch error: {0}")]
    Fetch(String),
    #[error("notification error: {0}")]
    Notification(String),
}
