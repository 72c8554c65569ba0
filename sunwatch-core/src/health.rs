//! Health tracking derived from publish recency and success.

use std::time::Duration;

use parking_lot::RwLock;
use sunwatch_types::SystemStatus;

/// Record of the most recent publish attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthState {
    /// Timestamp of the last publish attempt, successful or not.
    pub last_publish_ms: Option<u64>,
    /// Whether that attempt succeeded.
    pub last_publish_success: bool,
}

/// Derives a [`SystemStatus`] from publish freshness.
///
/// Status computation is a pure function of the recorded state and `now`,
/// so it is deterministic and trivially testable.
#[derive(Debug, Default)]
pub struct HealthMonitor {
    state: RwLock<HealthState>,
}

impl HealthMonitor {
    /// Create a monitor with no publishes recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a publish attempt at `at_ms`.
    pub fn record_publish(&self, success: bool, at_ms: u64) {
        *self.state.write() = HealthState {
            last_publish_ms: Some(at_ms),
            last_publish_success: success,
        };
    }

    /// A copy of the current state.
    pub fn state(&self) -> HealthState {
        *self.state.read()
    }

    /// Compute the status as of `now_ms`.
    ///
    /// - `initializing`: no publish has ever occurred
    /// - `healthy`: last publish succeeded within `stale_threshold`
    /// - `degraded`: last publish succeeded but the data has gone stale
    /// - `unhealthy`: last publish failed
    pub fn current_status(&self, now_ms: u64, stale_threshold: Duration) -> SystemStatus {
        let state = self.state();
        let Some(last_ms) = state.last_publish_ms else {
            return SystemStatus::Initializing;
        };
        if !state.last_publish_success {
            return SystemStatus::Unhealthy;
        }
        if now_ms.saturating_sub(last_ms) <= stale_threshold.as_millis() as u64 {
            SystemStatus::Healthy
        } else {
            SystemStatus::Degraded
        }
    }
}
