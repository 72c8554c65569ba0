//! Messages pushed to streaming subscribers.

use std::collections::BTreeMap;

use crate::{RegisterReading, Snapshot};

/// The readings carried by an `update` message: just what changed on the
/// last publish, without the status field of a full snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotUpdate {
    /// All readings from the publish, keyed by register name.
    pub readings: BTreeMap<String, RegisterReading>,

    /// Unix timestamp in milliseconds of the publish.
    pub timestamp_ms: u64,
}

/// An envelope delivered to a streaming subscriber.
///
/// The first message after subscribing is always `initial` with the full
/// current snapshot; every subsequent publish produces an `update`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "data", rename_all = "lowercase")
)]
pub enum StreamMessage {
    /// Full current snapshot, sent once on subscribe.
    Initial(Snapshot),
    /// Incremental update from a publish.
    Update(SnapshotUpdate),
}

impl StreamMessage {
    /// Timestamp of the carried data, if any.
    pub fn timestamp_ms(&self) -> Option<u64> {
        match self {
            StreamMessage::Initial(snapshot) => snapshot.timestamp_ms,
            StreamMessage::Update(update) => Some(update.timestamp_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_comes_from_payload() {
        let initial = StreamMessage::Initial(Snapshot::initial());
        assert_eq!(initial.timestamp_ms(), None);

        let update = StreamMessage::Update(SnapshotUpdate {
            readings: BTreeMap::new(),
            timestamp_ms: 42,
        });
        assert_eq!(update.timestamp_ms(), Some(42));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn update_envelope_is_tagged() {
        let mut readings = BTreeMap::new();
        readings.insert(
            "total_active_power".to_string(),
            crate::RegisterReading::numeric(100.0, "W", 1),
        );
        let message = StreamMessage::Update(SnapshotUpdate {
            readings,
            timestamp_ms: 1703160000000,
        });

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "update");
        assert_eq!(json["data"]["timestamp_ms"], 1703160000000u64);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn initial_envelope_is_tagged() {
        let message = StreamMessage::Initial(Snapshot::initial());
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "initial");
        assert_eq!(json["data"]["status"], "initializing");
    }
}
