use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::PortfolioSnapshot;

/// Holds the most recently published snapshot and hands out versions.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    latest: RwLock<Option<Arc<PortfolioSnapshot>>>,
    version: AtomicU64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next snapshot version. Versions start at 1.
    pub fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> Option<Arc<PortfolioSnapshot>> {
        match self.latest.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replaces the latest snapshot unless a newer version is already published.
    pub fn publish(&self, snapshot: PortfolioSnapshot) -> Arc<PortfolioSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut guard = match self.latest.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_ref() {
            Some(current) if current.version > snapshot.version => current.clone(),
            _ => {
                *guard = Some(snapshot.clone());
                snapshot
            }
        }
    }
}
