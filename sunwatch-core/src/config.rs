//! Service configuration.

use std::time::Duration;

use crate::error::TelemetryError;

/// Configuration for a [`TelemetryService`](crate::TelemetryService).
///
/// Defaults size the buffer for 24 hours of history at one-minute polls,
/// with a stale threshold of three missed 30-second poll cycles.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum number of history points retained (FIFO eviction).
    pub history_capacity: usize,

    /// Maximum age of the last successful publish before the service is
    /// considered degraded.
    pub stale_threshold: Duration,

    /// Bounded queue depth per subscriber. A subscriber whose queue stays
    /// full past the delivery timeout is dropped.
    pub subscriber_queue: usize,

    /// Bounded depth of the dispatcher's event feed.
    pub dispatch_queue: usize,

    /// Per-subscriber delivery deadline for one broadcast pass.
    pub delivery_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            history_capacity: 1440,
            stale_threshold: Duration::from_secs(90),
            subscriber_queue: 16,
            dispatch_queue: 64,
            delivery_timeout: Duration::from_secs(1),
        }
    }
}

impl ServiceConfig {
    /// Create a builder for configuring the service.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::new()
    }

    /// Check the configuration for values that cannot work at runtime.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.history_capacity == 0 {
            return Err(TelemetryError::Configuration(
                "history capacity must be non-zero".into(),
            ));
        }
        if self.subscriber_queue == 0 {
            return Err(TelemetryError::Configuration(
                "subscriber queue depth must be non-zero".into(),
            ));
        }
        if self.dispatch_queue == 0 {
            return Err(TelemetryError::Configuration(
                "dispatch queue depth must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    history_capacity: Option<usize>,
    stale_threshold: Option<Duration>,
    subscriber_queue: Option<usize>,
    dispatch_queue: Option<usize>,
    delivery_timeout: Option<Duration>,
}

impl ServiceConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the history capacity.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    /// Set the stale threshold.
    pub fn stale_threshold(mut self, threshold: Duration) -> Self {
        self.stale_threshold = Some(threshold);
        self
    }

    /// Set the per-subscriber queue depth.
    pub fn subscriber_queue(mut self, depth: usize) -> Self {
        self.subscriber_queue = Some(depth);
        self
    }

    /// Set the dispatcher feed depth.
    pub fn dispatch_queue(mut self, depth: usize) -> Self {
        self.dispatch_queue = Some(depth);
        self
    }

    /// Set the per-subscriber delivery timeout.
    pub fn delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        ServiceConfig {
            history_capacity: self.history_capacity.unwrap_or(defaults.history_capacity),
            stale_threshold: self.stale_threshold.unwrap_or(defaults.stale_threshold),
            subscriber_queue: self.subscriber_queue.unwrap_or(defaults.subscriber_queue),
            dispatch_queue: self.dispatch_queue.unwrap_or(defaults.dispatch_queue),
            delivery_timeout: self.delivery_timeout.unwrap_or(defaults.delivery_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_exporter_sizing() {
        let config = ServiceConfig::default();
        assert_eq!(config.history_capacity, 1440);
        assert_eq!(config.stale_threshold, Duration::from_secs(90));
    }

    #[test]
    fn builder_overrides_selected_fields() {
        let config = ServiceConfig::builder()
            .history_capacity(60)
            .delivery_timeout(Duration::from_millis(250))
            .build();

        assert_eq!(config.history_capacity, 60);
        assert_eq!(config.delivery_timeout, Duration::from_millis(250));
        // Untouched fields keep their defaults
        assert_eq!(config.subscriber_queue, 16);
    }

    #[test]
    fn zero_history_capacity_is_rejected() {
        let config = ServiceConfig::builder().history_capacity(0).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_queue_depths_are_rejected() {
        assert!(ServiceConfig::builder().subscriber_queue(0).build().validate().is_err());
        assert!(ServiceConfig::builder().dispatch_queue(0).build().validate().is_err());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ServiceConfig::default().validate().is_ok());
    }
}
