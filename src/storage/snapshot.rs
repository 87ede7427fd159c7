//! JSON-file implementation of ResultsStore.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use super::{ResultsStore, StorageError};

/// Results of one check cycle, persisted for comparison with future runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsSnapshot {
    /// When the snapshot was taken. None for the empty snapshot.
    pub timestamp: Option<DateTime<Utc>>,
    /// Check-in dates that were bookable.
    pub available_dates: Vec<NaiveDate>,
    /// Weekend pairs found, as (first, second) check-in dates.
    pub weekend_pairs: Vec<(NaiveDate, NaiveDate)>,
}

impl ResultsSnapshot {
    /// Creates a snapshot stamped with the current time.
    pub fn new(
        available_dates: Vec<NaiveDate>,
        weekend_pairs: Vec<(NaiveDate, NaiveDate)>,
    ) -> Self {
        Self {
            timestamp: Some(Utc::now()),
            available_dates,
            weekend_pairs,
        }
    }

    /// Returns the dates in `current` that this snapshot does not contain.
    pub fn newly_available(&self, current: &[NaiveDate]) -> Vec<NaiveDate> {
        current
            .iter()
            .copied()
            .filter(|d| !self.available_dates.contains(d))
            .collect()
    }
}

/// JsonFileStore implements ResultsStore on a flat JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ResultsStore for JsonFileStore {
    async fn load(&self) -> Result<ResultsSnapshot, StorageError> {
        if !self.path.exists() {
            return Ok(ResultsSnapshot::default());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, snapshot: &ResultsSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), "saved results snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_newly_available_diffs_against_snapshot() {
        let snapshot = ResultsSnapshot::new(vec![date(2025, 6, 6)], vec![]);
        let current = vec![date(2025, 6, 6), date(2025, 6, 7)];
        assert_eq!(snapshot.newly_available(&current), vec![date(2025, 6, 7)]);
    }

    #[test]
    fn test_newly_available_everything_new_on_empty_snapshot() {
        let snapshot = ResultsSnapshot::default();
        let current = vec![date(2025, 6, 6), date(2025, 6, 7)];
        assert_eq!(snapshot.newly_available(&current), current);
    }

    #[test]
    fn test_newly_available_nothing_new_when_unchanged() {
        let dates = vec![date(2025, 6, 6), date(2025, 6, 7)];
        let snapshot = ResultsSnapshot::new(dates.clone(), vec![]);
        assert!(snapshot.newly_available(&dates).is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("last_results.json"));

        let snapshot = ResultsSnapshot::new(
            vec![date(2025, 6, 6), date(2025, 6, 7)],
            vec![(date(2025, 6, 6), date(2025, 6, 7))],
        );
        store.save(&snapshot).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.available_dates, snapshot.available_dates);
        assert_eq!(loaded.weekend_pairs, snapshot.weekend_pairs);
        assert!(loaded.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_load_missing_file_yields_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));

        let loaded = store.load().await.unwrap();
        assert!(loaded.timestamp.is_none());
        assert!(loaded.available_dates.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_results.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(path);
        assert!(matches!(store.load().await, Err(StorageError::Json(_))));
    }
}
