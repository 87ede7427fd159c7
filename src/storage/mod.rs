//! Storage for check results carried across runs.

mod snapshot;

pub use snapshot::{JsonFileStore, ResultsSnapshot};

use async_trait::async_trait;

/// ResultsStore defines the interface for persisting the results of the
/// most recent check cycle.
#[async_trait]
pub trait ResultsStore: Send + Sync {
    /// Load the snapshot of the previous cycle's results.
    /// A missing snapshot yields an empty one.
    async fn load(&self) -> Result<ResultsSnapshot, StorageError>;

    /// Persist the given snapshot, replacing any previous one.
    async fn save(&self, snapshot: &ResultsSnapshot) -> Result<(), StorageError>;
}

/// StorageError represents errors during snapshot persistence.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
