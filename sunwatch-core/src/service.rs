//! The telemetry service - the single entry point external collaborators call.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sunwatch_types::{
    current_timestamp_ms, HistoryPoint, RegisterReading, Snapshot, SnapshotUpdate, StreamMessage,
    SystemStatus, VERSION,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::{
    format_uptime, HealthDetailed, HealthSimple, HistoryEntry, HistoryQuery, HistoryReport,
    RegisterDetail, StatusReport,
};
use crate::config::ServiceConfig;
use crate::dispatch::{BroadcastDispatcher, DispatcherHandle};
use crate::error::TelemetryError;
use crate::health::HealthMonitor;
use crate::history::HistoryBuffer;
use crate::registry::{SubscriberId, SubscriberRegistry, Subscription};
use crate::store::SnapshotStore;
use crate::summary::Summary;

/// Composition root over the snapshot store, history buffer, health
/// monitor, subscriber registry, and broadcast dispatcher.
///
/// One instance is constructed explicitly at startup and passed by
/// reference to every collaborator - there are no ambient globals. A
/// single producer calls [`publish`](Self::publish); any number of readers
/// call the query operations concurrently; streaming consumers call
/// [`subscribe`](Self::subscribe).
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use sunwatch_core::{ServiceConfig, TelemetryService};
/// use sunwatch_types::{current_timestamp_ms, RegisterReading};
///
/// #[tokio::main]
/// async fn main() -> Result<(), sunwatch_core::TelemetryError> {
///     let service = TelemetryService::new(ServiceConfig::default())?;
///
///     let mut readings = BTreeMap::new();
///     readings.insert(
///         "total_active_power".to_string(),
///         RegisterReading::numeric(4200.0, "W", 5031),
///     );
///     service.publish(readings, current_timestamp_ms());
///
///     assert_eq!(service.snapshot().len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct TelemetryService {
    config: ServiceConfig,
    store: SnapshotStore,
    history: HistoryBuffer,
    health: HealthMonitor,
    registry: Arc<SubscriberRegistry>,
    dispatcher: DispatcherHandle,
    started: Instant,
}

impl TelemetryService {
    /// Create the service and spawn its background dispatcher task.
    ///
    /// Must be called within a tokio runtime. Fails with
    /// [`TelemetryError::Configuration`] when the config cannot work.
    pub fn new(config: ServiceConfig) -> Result<Self, TelemetryError> {
        config.validate()?;

        let registry = Arc::new(SubscriberRegistry::new());
        let dispatcher = BroadcastDispatcher::spawn(
            registry.clone(),
            config.dispatch_queue,
            config.delivery_timeout,
        );

        info!(
            history_capacity = config.history_capacity,
            stale_threshold_s = config.stale_threshold.as_secs(),
            "telemetry service started"
        );

        Ok(Self {
            store: SnapshotStore::new(),
            history: HistoryBuffer::new(config.history_capacity),
            health: HealthMonitor::new(),
            registry,
            dispatcher,
            started: Instant::now(),
            config,
        })
    }

    /// Publish a new set of readings scraped at `timestamp_ms`.
    ///
    /// Atomically replaces the current snapshot, appends a history point,
    /// and hands the update to the background dispatcher. Never blocks on
    /// subscribers.
    pub fn publish(&self, readings: BTreeMap<String, RegisterReading>, timestamp_ms: u64) {
        self.health.record_publish(true, timestamp_ms);
        let status = self
            .health
            .current_status(timestamp_ms, self.config.stale_threshold);

        let register_count = readings.len();
        self.store.replace(Snapshot {
            readings: readings.clone(),
            timestamp_ms: Some(timestamp_ms),
            status,
        });
        self.history
            .append(HistoryPoint::new(timestamp_ms, readings.clone()));
        self.dispatcher.enqueue(StreamMessage::Update(SnapshotUpdate {
            readings,
            timestamp_ms,
        }));

        debug!(registers = register_count, timestamp_ms, "snapshot published");
    }

    /// Record a failed poll cycle. Drives the status to `unhealthy` until
    /// the next successful publish.
    pub fn record_publish_failure(&self, timestamp_ms: u64) {
        self.health.record_publish(false, timestamp_ms);
        debug!(timestamp_ms, "publish failure recorded");
    }

    /// The current snapshot. Before the first publish this is the initial
    /// `initializing` snapshot with no readings.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    /// The status as of now, recomputed from publish freshness so
    /// staleness surfaces without waiting for the next publish.
    pub fn current_status(&self) -> SystemStatus {
        self.health
            .current_status(current_timestamp_ms(), self.config.stale_threshold)
    }

    /// System status overview.
    pub fn status(&self) -> StatusReport {
        let snapshot = self.store.current();
        StatusReport {
            status: self.current_status(),
            timestamp_ms: snapshot.timestamp_ms,
            registers_count: snapshot.len(),
            history_points: self.history.len(),
        }
    }

    /// All current register readings.
    pub fn all_registers(&self) -> BTreeMap<String, RegisterReading> {
        self.store.current().readings.clone()
    }

    /// Detail for one register, or `RegisterNotFound` if it is absent from
    /// the current snapshot.
    pub fn register(&self, name: &str) -> Result<RegisterDetail, TelemetryError> {
        let snapshot = self.store.current();
        let reading = snapshot
            .get(name)
            .ok_or_else(|| TelemetryError::register_not_found(name))?;
        Ok(RegisterDetail {
            name: name.to_string(),
            value: reading.value.clone(),
            unit: reading.unit.clone(),
            address: reading.address,
            timestamp_ms: snapshot.timestamp_ms,
        })
    }

    /// Dashboard summary. Missing registers degrade to defaults; never
    /// fails.
    pub fn summary(&self) -> Summary {
        Summary::from_snapshot(&self.store.current())
    }

    /// Windowed history for one register, window ending now.
    pub fn history(&self, query: &HistoryQuery) -> HistoryReport {
        let now_ms = current_timestamp_ms();
        let window = Duration::from_secs(u64::from(query.hours) * 3600);
        let data: Vec<HistoryEntry> = self
            .history
            .query(window, &query.register, now_ms)
            .into_iter()
            .map(|(timestamp_ms, value)| HistoryEntry {
                timestamp_ms,
                value,
            })
            .collect();

        HistoryReport {
            register: query.register.clone(),
            hours: query.hours,
            data_points: data.len(),
            data,
        }
    }

    /// Register a new streaming subscriber.
    ///
    /// The first message on the returned subscription is `initial` with
    /// the full current snapshot; each subsequent publish delivers an
    /// `update`. Dropping the subscription disconnects it.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.config.subscriber_queue);

        // Queue the initial snapshot before the subscriber can receive
        // updates; capacity is at least 1, so this cannot fail.
        let snapshot = self.store.current();
        let _ = tx.try_send(StreamMessage::Initial(snapshot.as_ref().clone()));

        let id = self.registry.add(tx);
        info!(subscriber = %id, "subscriber connected");
        Subscription::new(id, rx, self.registry.clone())
    }

    /// Disconnect a subscriber explicitly. Idempotent.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.registry.remove(id)
    }

    /// Number of currently-connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Minimal health payload for liveness probes.
    pub fn health_simple(&self) -> HealthSimple {
        HealthSimple {
            status: self.current_status(),
            version: VERSION.to_string(),
        }
    }

    /// Full health payload for operators.
    pub fn health_detailed(&self) -> HealthDetailed {
        let now_ms = current_timestamp_ms();
        let state = self.health.state();
        let snapshot = self.store.current();
        let uptime_seconds = self.started.elapsed().as_secs();

        HealthDetailed {
            status: self
                .health
                .current_status(now_ms, self.config.stale_threshold),
            version: VERSION.to_string(),
            uptime_seconds,
            uptime_human: format_uptime(uptime_seconds),
            last_scrape_time_ms: state.last_publish_ms,
            last_scrape_success: state.last_publish_success,
            total_registers: snapshot.len(),
            inverter_connected: state.last_publish_success,
            timestamp_ms: now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunwatch_types::RegisterValue;

    fn service() -> TelemetryService {
        TelemetryService::new(ServiceConfig::default()).unwrap()
    }

    fn single_reading(power: f64) -> BTreeMap<String, RegisterReading> {
        let mut readings = BTreeMap::new();
        readings.insert(
            "total_active_power".to_string(),
            RegisterReading::numeric(power, "W", 1),
        );
        readings
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let config = ServiceConfig::builder().history_capacity(0).build();
        assert!(matches!(
            TelemetryService::new(config),
            Err(TelemetryError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn initializing_before_first_publish() {
        let service = service();
        let report = service.status();
        assert_eq!(report.status, SystemStatus::Initializing);
        assert_eq!(report.registers_count, 0);
        assert_eq!(report.history_points, 0);
        assert!(service.snapshot().is_empty());
    }

    #[tokio::test]
    async fn publish_makes_the_reading_visible_and_healthy() {
        let service = service();
        let t0 = current_timestamp_ms();
        service.publish(single_reading(100.0), t0);

        let snapshot = service.snapshot();
        assert_eq!(snapshot.timestamp_ms, Some(t0));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot.get("total_active_power").unwrap().value.as_f64(),
            Some(100.0)
        );
        assert_eq!(snapshot.status, SystemStatus::Healthy);
        assert_eq!(service.current_status(), SystemStatus::Healthy);
    }

    #[tokio::test]
    async fn publish_failure_turns_unhealthy() {
        let service = service();
        service.publish(single_reading(100.0), current_timestamp_ms());
        service.record_publish_failure(current_timestamp_ms());

        assert_eq!(service.current_status(), SystemStatus::Unhealthy);

        let health = service.health_detailed();
        assert!(!health.last_scrape_success);
        assert!(!health.inverter_connected);
    }

    #[tokio::test]
    async fn unknown_register_is_not_found() {
        let service = service();
        service.publish(single_reading(100.0), current_timestamp_ms());

        let err = service.register("unknown").unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::RegisterNotFound { register } if register == "unknown"
        ));
    }

    #[tokio::test]
    async fn register_detail_includes_snapshot_timestamp() {
        let service = service();
        let t0 = current_timestamp_ms();
        service.publish(single_reading(250.0), t0);

        let detail = service.register("total_active_power").unwrap();
        assert_eq!(detail.name, "total_active_power");
        assert_eq!(detail.value, RegisterValue::Number(250.0));
        assert_eq!(detail.unit, "W");
        assert_eq!(detail.timestamp_ms, Some(t0));
    }

    #[tokio::test]
    async fn history_of_a_missing_register_is_empty() {
        let service = service();
        service.publish(single_reading(100.0), current_timestamp_ms());

        let report = service.history(&HistoryQuery {
            hours: 1,
            register: "missing".to_string(),
        });
        assert_eq!(report.data_points, 0);
        assert!(report.data.is_empty());
    }

    #[tokio::test]
    async fn history_returns_published_points() {
        let service = service();
        let now = current_timestamp_ms();
        service.publish(single_reading(100.0), now - 1000);
        service.publish(single_reading(200.0), now);

        let report = service.history(&HistoryQuery::default());
        assert_eq!(report.register, "total_active_power");
        assert_eq!(report.hours, 24);
        assert_eq!(report.data_points, 2);
        assert_eq!(report.data[0].value, RegisterValue::Number(100.0));
        assert_eq!(report.data[1].value, RegisterValue::Number(200.0));
    }

    #[tokio::test]
    async fn all_registers_returns_the_current_map() {
        let service = service();
        service.publish(single_reading(100.0), current_timestamp_ms());

        let registers = service.all_registers();
        assert_eq!(registers.len(), 1);
        assert!(registers.contains_key("total_active_power"));
    }

    #[tokio::test]
    async fn summary_never_fails_on_missing_registers() {
        let service = service();
        let summary = service.summary();
        assert_eq!(summary.production.current, 0.0);
        assert_eq!(summary.status, "unknown");
    }

    #[tokio::test]
    async fn subscriber_gets_initial_then_updates() {
        let service = service();
        let t0 = current_timestamp_ms();
        service.publish(single_reading(100.0), t0);

        let mut subscription = service.subscribe();
        assert_eq!(service.subscriber_count(), 1);

        match subscription.recv().await.unwrap() {
            StreamMessage::Initial(snapshot) => {
                assert_eq!(snapshot.timestamp_ms, Some(t0));
                assert_eq!(snapshot.len(), 1);
            }
            other => panic!("expected initial message, got {other:?}"),
        }

        let t1 = t0 + 1000;
        service.publish(single_reading(200.0), t1);

        match subscription.recv().await.unwrap() {
            StreamMessage::Update(update) => {
                assert_eq!(update.timestamp_ms, t1);
                assert_eq!(
                    update.readings.get("total_active_power").unwrap().value,
                    RegisterValue::Number(200.0)
                );
            }
            other => panic!("expected update message, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dropping_a_subscription_disconnects_it() {
        let service = service();
        let subscription = service.subscribe();
        assert_eq!(service.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(service.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let service = service();
        let subscription = service.subscribe();
        let id = subscription.id();

        assert!(service.unsubscribe(id));
        assert!(!service.unsubscribe(id));
    }

    #[tokio::test]
    async fn health_payloads_report_version_and_uptime() {
        let service = service();
        service.publish(single_reading(100.0), current_timestamp_ms());

        let simple = service.health_simple();
        assert_eq!(simple.status, SystemStatus::Healthy);
        assert!(!simple.version.is_empty());

        let detailed = service.health_detailed();
        assert_eq!(detailed.status, SystemStatus::Healthy);
        assert_eq!(detailed.total_registers, 1);
        assert_eq!(detailed.uptime_human, format_uptime(detailed.uptime_seconds));
        assert!(detailed.uptime_human.ends_with('s') || detailed.uptime_human.ends_with('m'));
        assert!(detailed.last_scrape_success);
        assert!(detailed.inverter_connected);
        assert!(detailed.last_scrape_time_ms.is_some());
    }

    #[tokio::test]
    async fn status_counts_history_points() {
        let service = service();
        let now = current_timestamp_ms();
        service.publish(single_reading(1.0), now - 2000);
        service.publish(single_reading(2.0), now - 1000);
        service.publish(single_reading(3.0), now);

        let report = service.status();
        assert_eq!(report.history_points, 3);
        assert_eq!(report.registers_count, 1);
        assert_eq!(report.timestamp_ms, Some(now));
    }
}
