//! Response payloads for the read operations exposed to transport layers.
//!
//! Field names match the JSON contract the dashboard clients consume.

use serde::{Deserialize, Serialize};
use sunwatch_types::{RegisterValue, SystemStatus};

/// Current system status overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: SystemStatus,
    pub timestamp_ms: Option<u64>,
    pub registers_count: usize,
    pub history_points: usize,
}

/// Detail for a single register, including the snapshot timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterDetail {
    pub name: String,
    pub value: RegisterValue,
    pub unit: String,
    pub address: u16,
    pub timestamp_ms: Option<u64>,
}

/// Parameters for a history query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Window size in hours, ending now.
    pub hours: u32,
    /// Register to extract from each retained point.
    pub register: String,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            hours: 24,
            register: "total_active_power".to_string(),
        }
    }
}

/// One sample in a history response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp_ms: u64,
    pub value: RegisterValue,
}

/// Windowed history for one register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryReport {
    pub register: String,
    pub hours: u32,
    pub data_points: usize,
    pub data: Vec<HistoryEntry>,
}

/// Minimal health payload for liveness probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSimple {
    pub status: SystemStatus,
    pub version: String,
}

/// Full health payload for operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDetailed {
    pub status: SystemStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub uptime_human: String,
    pub last_scrape_time_ms: Option<u64>,
    pub last_scrape_success: bool,
    pub total_registers: usize,
    pub inverter_connected: bool,
    pub timestamp_ms: u64,
}

/// Format an uptime compactly for operators, e.g. "2d 4h 11m 5s".
///
/// Zero components are skipped; a zero uptime still renders as "0s".
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }
    parts.join(" ")
}
