//! The snapshot store - holds the single most-recent telemetry snapshot.

use std::sync::Arc;

use parking_lot::RwLock;
use sunwatch_types::Snapshot;

/// Holds the current [`Snapshot`] behind a whole-value swap.
///
/// A publish replaces the stored `Arc<Snapshot>`; readers clone the `Arc`
/// and therefore always observe either the previous or the new snapshot in
/// full, never a mix of the two. The lock is held only for the pointer
/// swap or clone, so readers never block the writer for long.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    /// Create a store holding the initial `initializing` snapshot.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::initial())),
        }
    }

    /// Replace the current snapshot wholesale.
    pub fn replace(&self, snapshot: Snapshot) {
        *self.current.write() = Arc::new(snapshot);
    }

    /// Get the current snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
