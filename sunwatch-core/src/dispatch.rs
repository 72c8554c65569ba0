//! Broadcast dispatch - fan-out of update events to subscribers.

use std::sync::Arc;
use std::time::Duration;

use sunwatch_types::StreamMessage;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::registry::SubscriberRegistry;

/// Delivers update events to every registered subscriber, isolating and
/// pruning failures.
///
/// One delivery failure - a closed queue or a send that cannot complete
/// within the delivery timeout - removes that subscriber from the registry
/// and moves on; it never aborts delivery to the remaining subscribers and
/// never surfaces to the producer.
#[derive(Debug)]
pub struct BroadcastDispatcher {
    registry: Arc<SubscriberRegistry>,
    delivery_timeout: Duration,
}

impl BroadcastDispatcher {
    /// Create a dispatcher over a subscriber registry.
    pub fn new(registry: Arc<SubscriberRegistry>, delivery_timeout: Duration) -> Self {
        Self {
            registry,
            delivery_timeout,
        }
    }

    /// Run one broadcast pass over a point-in-time membership snapshot.
    ///
    /// The registry lock is released before any delivery is awaited; a
    /// subscriber added mid-pass simply catches the next event.
    pub async fn broadcast(&self, message: StreamMessage) {
        let members = self.registry.snapshot_members();
        if members.is_empty() {
            return;
        }

        let mut delivered = 0usize;
        for (id, sender) in members {
            let outcome =
                tokio::time::timeout(self.delivery_timeout, sender.send(message.clone())).await;
            match outcome {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(_)) => {
                    warn!(subscriber = %id, "subscriber queue closed, removing");
                    self.registry.remove(id);
                }
                Err(_) => {
                    warn!(
                        subscriber = %id,
                        timeout_ms = self.delivery_timeout.as_millis() as u64,
                        "delivery timed out, removing slow subscriber"
                    );
                    self.registry.remove(id);
                }
            }
        }
        debug!(delivered, "broadcast pass complete");
    }

    /// Spawn the background dispatcher task consuming a bounded event feed.
    ///
    /// Must be called within a tokio runtime. The task exits when the
    /// handle's feed is dropped or `stop()` is called.
    pub fn spawn(
        registry: Arc<SubscriberRegistry>,
        feed_capacity: usize,
        delivery_timeout: Duration,
    ) -> DispatcherHandle {
        let (feed_tx, mut feed_rx) = mpsc::channel(feed_capacity);
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let dispatcher = BroadcastDispatcher::new(registry, delivery_timeout);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = feed_rx.recv() => match event {
                        Some(message) => dispatcher.broadcast(message).await,
                        None => break,
                    },
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("dispatcher task stopped");
        });

        DispatcherHandle { feed: feed_tx, stop_tx }
    }
}

/// Handle feeding events to the background dispatcher task.
///
/// Dropping the handle stops the task once the feed drains; call `stop()`
/// to end it explicitly.
#[derive(Debug)]
pub struct DispatcherHandle {
    feed: mpsc::Sender<StreamMessage>,
    stop_tx: watch::Sender<bool>,
}

impl DispatcherHandle {
    /// Hand an event to the dispatcher without blocking the caller.
    ///
    /// Best effort: if the feed is full the event is dropped with a
    /// warning rather than stalling the publish path.
    pub fn enqueue(&self, message: StreamMessage) {
        if let Err(err) = self.feed.try_send(message) {
            warn!(%err, "dispatcher feed rejected event");
        }
    }

    /// Stop the dispatcher task.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}
