//! Version reported by health endpoints.

/// The sunwatch version string, embedded in health payloads so operators
/// can tell which build is serving.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
