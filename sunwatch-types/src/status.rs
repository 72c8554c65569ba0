//! Overall system status derived from publish freshness.

/// Health status of the telemetry service as a whole.
///
/// Variants follow the service lifecycle: `initializing` until the first
/// publish, then one of the freshness-derived states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SystemStatus {
    /// Service started, no data published yet.
    Initializing,
    /// Last publish succeeded and is within the freshness threshold.
    Healthy,
    /// Last publish succeeded but the data has gone stale.
    Degraded,
    /// Last publish failed, or no publish ever succeeded.
    Unhealthy,
}

impl SystemStatus {
    /// Lowercase wire representation, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemStatus::Initializing => "initializing",
            SystemStatus::Healthy => "healthy",
            SystemStatus::Degraded => "degraded",
            SystemStatus::Unhealthy => "unhealthy",
        }
    }

    /// Whether a simple health probe should report success.
    ///
    /// Only `healthy` maps to a 200-equivalent; everything else is a
    /// 503-equivalent for the transport layer to surface.
    pub fn is_serving(&self) -> bool {
        matches!(self, SystemStatus::Healthy)
    }
}

impl Default for SystemStatus {
    fn default() -> Self {
        SystemStatus::Initializing
    }
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
