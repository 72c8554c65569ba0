//! Error types for the telemetry core.

use thiserror::Error;

/// Errors surfaced by the telemetry core.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Queried register is absent from the current snapshot.
    ///
    /// Maps to a 404 at the transport layer; never fatal.
    #[error("register not found: {register}")]
    RegisterNotFound {
        /// The register name that was queried.
        register: String,
    },

    /// Delivery to a subscriber failed (closed connection or timeout).
    ///
    /// Recovered locally by removing the subscriber; never propagated to
    /// the producer or to other subscribers.
    #[error("subscriber delivery failed: {0}")]
    Transport(String),

    /// Invalid configuration, or a listener that cannot start.
    ///
    /// Fatal at startup; the service does not begin serving.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl TelemetryError {
    /// Create a not-found error for a register name.
    pub fn register_not_found(register: impl Into<String>) -> Self {
        TelemetryError::RegisterNotFound {
            register: register.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_register() {
        let err = TelemetryError::register_not_found("battery_level");
        assert_eq!(err.to_string(), "register not found: battery_level");
    }

    #[test]
    fn configuration_error_message() {
        let err = TelemetryError::Configuration("history capacity must be non-zero".into());
        assert!(err.to_string().starts_with("configuration error"));
    }
}
