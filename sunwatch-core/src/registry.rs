//! Subscriber membership tracking.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use sunwatch_types::StreamMessage;
use tokio::sync::mpsc;
use tracing::debug;

/// Identifier of a streaming subscriber. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tracks currently-connected streaming subscribers.
///
/// Membership is mutated by two independent sources - connect/disconnect
/// from the transport layer and failure-driven removals from the
/// dispatcher - so the registry carries its own lock, independent of the
/// snapshot lock. The lock is never held across a delivery attempt.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    members: RwLock<BTreeMap<SubscriberId, mpsc::Sender<StreamMessage>>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber's send queue, returning its fresh id.
    pub fn add(&self, sender: mpsc::Sender<StreamMessage>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.members.write().insert(id, sender);
        id
    }

    /// Remove a subscriber. Idempotent; removing an absent subscriber is a
    /// no-op. Returns whether the subscriber was present.
    pub fn remove(&self, id: SubscriberId) -> bool {
        let removed = self.members.write().remove(&id).is_some();
        if removed {
            debug!(subscriber = %id, "subscriber removed");
        }
        removed
    }

    /// A stable, point-in-time copy of the current members.
    ///
    /// The dispatcher iterates this copy, so concurrent add/remove during
    /// a broadcast pass never mutates the set mid-iteration.
    pub fn snapshot_members(&self) -> Vec<(SubscriberId, mpsc::Sender<StreamMessage>)> {
        self.members
            .read()
            .iter()
            .map(|(id, sender)| (*id, sender.clone()))
            .collect()
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    /// Whether no subscribers are registered.
    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }
}

/// A live subscription held by one streaming consumer.
///
/// Receives [`StreamMessage`]s pushed by the dispatcher. Dropping the
/// subscription removes it from the registry; any pending or in-flight
/// delivery to it is abandoned, never replayed.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<StreamMessage>,
    registry: Arc<SubscriberRegistry>,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriberId,
        receiver: mpsc::Receiver<StreamMessage>,
        registry: Arc<SubscriberRegistry>,
    ) -> Self {
        Self {
            id,
            receiver,
            registry,
        }
    }

    /// This subscription's id.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Receive the next message, or `None` once the subscriber has been
    /// removed and its queue drained.
    pub async fn recv(&mut self) -> Option<StreamMessage> {
        self.receiver.recv().await
    }

    /// Receive without waiting, if a message is queued.
    pub fn try_recv(&mut self) -> Option<StreamMessage> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}
