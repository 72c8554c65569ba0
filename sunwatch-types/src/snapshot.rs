//! Snapshot - a point-in-time view of all register readings.

use std::collections::BTreeMap;

use crate::{RegisterReading, SystemStatus};

/// The single current set of named readings plus timestamp and status.
///
/// Exactly one snapshot is "current" at any time; a publish replaces it
/// wholesale, never mutates it in place, so concurrent readers always see
/// either the previous or the new snapshot in full.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// All current readings, keyed by register name.
    pub readings: BTreeMap<String, RegisterReading>,

    /// Unix timestamp in milliseconds of the publish that produced this
    /// snapshot. `None` only for the initial pre-publish snapshot.
    pub timestamp_ms: Option<u64>,

    /// Service status at the time this snapshot was published.
    pub status: SystemStatus,
}

impl Snapshot {
    /// The initial snapshot served before the first publish: no readings,
    /// no timestamp, status `initializing`.
    pub fn initial() -> Self {
        Self {
            readings: BTreeMap::new(),
            timestamp_ms: None,
            status: SystemStatus::Initializing,
        }
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    /// Check if the snapshot has no readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Number of registers in the snapshot.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Get the reading for a specific register.
    pub fn get(&self, register: &str) -> Option<&RegisterReading> {
        self.readings.get(register)
    }

    /// Iterate over all readings.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegisterReading)> {
        self.readings.iter()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::initial()
    }
}

/// One retained past snapshot, used for windowed history queries.
///
/// Immutable, appended once, evicted oldest-first.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryPoint {
    /// Unix timestamp in milliseconds of the originating publish.
    pub timestamp_ms: u64,

    /// The readings as published, keyed by register name.
    pub readings: BTreeMap<String, RegisterReading>,
}

impl HistoryPoint {
    /// Create a new history point.
    pub fn new(timestamp_ms: u64, readings: BTreeMap<String, RegisterReading>) -> Self {
        Self {
            timestamp_ms,
            readings,
        }
    }
}

/// Builder for constructing `Snapshot` instances.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    timestamp_ms: Option<u64>,
    status: Option<SystemStatus>,
    readings: BTreeMap<String, RegisterReading>,
}

impl SnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the publish timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    /// Set the status. Defaults to `healthy` when any timestamp is set,
    /// `initializing` otherwise.
    pub fn status(mut self, status: SystemStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Add a single reading.
    pub fn reading(mut self, name: impl Into<String>, reading: RegisterReading) -> Self {
        self.readings.insert(name.into(), reading);
        self
    }

    /// Add all readings from a map.
    pub fn readings(mut self, readings: BTreeMap<String, RegisterReading>) -> Self {
        self.readings.extend(readings);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> Snapshot {
        let status = self.status.unwrap_or(if self.timestamp_ms.is_some() {
            SystemStatus::Healthy
        } else {
            SystemStatus::Initializing
        });
        Snapshot {
            readings: self.readings,
            timestamp_ms: self.timestamp_ms,
            status,
        }
    }
}

/// Get the current timestamp in milliseconds since the Unix epoch.
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
