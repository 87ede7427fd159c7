//! Runtime statistics for the watcher.

/// Runtime statistics for the watcher.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub cycles: u64,
    pub fetch_failures: u64,
    pub dates_seen: u64,
    pub matches_found: u64,
    pub notifications_sent: u64,
}
