//! # sunwatch-core
//!
//! In-memory telemetry core for sunwatch: keeps the latest inverter
//! snapshot available for point queries, retains a bounded rolling history
//! for time-windowed queries, pushes live updates to streaming
//! subscribers, and derives overall health from data freshness.
//!
//! The polling producer, device protocol, and transport layer (HTTP,
//! WebSocket, ...) live outside this crate; they call the operations on
//! [`TelemetryService`] and serialize its responses.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use sunwatch_core::{HistoryQuery, ServiceConfig, TelemetryService};
//! use sunwatch_types::{current_timestamp_ms, RegisterReading};
//!
//! # tokio_test::block_on(async {
//! let service = TelemetryService::new(ServiceConfig::default()).unwrap();
//!
//! // The poll loop publishes each scrape
//! let mut readings = BTreeMap::new();
//! readings.insert(
//!     "total_active_power".to_string(),
//!     RegisterReading::numeric(4200.0, "W", 5031),
//! );
//! service.publish(readings, current_timestamp_ms());
//!
//! // Readers query independently at any time
//! let summary = service.summary();
//! let history = service.history(&HistoryQuery::default());
//!
//! // Streaming consumers subscribe for live updates
//! let mut subscription = service.subscribe();
//! let first = subscription.recv().await; // tagged `initial`
//! assert!(first.is_some());
//! # let _ = (summary, history);
//! # });
//! ```
//!
//! ## Concurrency model
//!
//! Exactly one logical writer (the producer's poll loop) and many
//! concurrent readers. Snapshots and history points are immutable after
//! construction and swapped by reference, so readers never observe a
//! partially-updated snapshot and never block the writer. Broadcast
//! delivery runs on a background task fed by a bounded queue; a slow or
//! dead subscriber is dropped after a per-delivery timeout instead of
//! stalling the producer.

mod api;
mod config;
mod dispatch;
mod error;
mod health;
mod history;
mod registry;
mod service;
mod store;
mod summary;

pub use api::{
    format_uptime, HealthDetailed, HealthSimple, HistoryEntry, HistoryQuery, HistoryReport,
    RegisterDetail, StatusReport,
};
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use dispatch::{BroadcastDispatcher, DispatcherHandle};
pub use error::TelemetryError;
pub use health::{HealthMonitor, HealthState};
pub use history::HistoryBuffer;
pub use registry::{SubscriberId, SubscriberRegistry, Subscription};
pub use service::TelemetryService;
pub use store::SnapshotStore;
pub use summary::{Battery, Consumption, Grid, Production, Summary};

// Re-export schema types for convenience
pub use sunwatch_types::{
    HistoryPoint, RegisterReading, RegisterValue, Snapshot, SnapshotUpdate, StreamMessage,
    SystemStatus,
};
