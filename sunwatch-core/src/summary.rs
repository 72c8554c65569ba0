//! Dashboard summary built from the current snapshot.
//!
//! Every field falls back independently when its register is absent, so
//! summary construction never fails: numeric fields default to 0, battery
//! and temperature to null, and status to "unknown".

use serde::{Deserialize, Serialize};
use sunwatch_types::Snapshot;

/// Production figures (inverter output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Production {
    /// Current output power, from `total_active_power`.
    pub current: f64,
    /// Today's yield, from `daily_power_yields`.
    pub daily: f64,
    /// Lifetime yield, from `total_power_yields`.
    pub total: f64,
}

/// Consumption figures (household load).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumption {
    /// Current load power, from `load_power`.
    pub current: f64,
}

/// Grid exchange figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub export: f64,
    pub import: f64,
    pub daily_export: f64,
    pub daily_import: f64,
}

/// Battery state, null when no battery registers are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    pub level: Option<f64>,
    pub power: Option<f64>,
}

/// Key dashboard metrics extracted from the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub production: Production,
    pub consumption: Consumption,
    pub grid: Grid,
    pub battery: Battery,
    /// Internal inverter temperature, from `internal_temperature`.
    pub temperature: Option<f64>,
    /// Inverter run state string, from `run_state`.
    pub status: String,
    /// Timestamp of the snapshot the summary was built from.
    pub timestamp_ms: Option<u64>,
}

impl Summary {
    /// Build a summary from a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let numeric = |register: &str| -> Option<f64> {
            snapshot.get(register).and_then(|r| r.value.as_f64())
        };

        Self {
            production: Production {
                current: numeric("total_active_power").unwrap_or(0.0),
                daily: numeric("daily_power_yields").unwrap_or(0.0),
                total: numeric("total_power_yields").unwrap_or(0.0),
            },
            consumption: Consumption {
                current: numeric("load_power").unwrap_or(0.0),
            },
            grid: Grid {
                export: numeric("export_to_grid").unwrap_or(0.0),
                import: numeric("import_from_grid").unwrap_or(0.0),
                daily_export: numeric("daily_export_to_grid").unwrap_or(0.0),
                daily_import: numeric("daily_import_from_grid").unwrap_or(0.0),
            },
            battery: Battery {
                level: numeric("battery_level"),
                power: numeric("battery_power"),
            },
            temperature: numeric("internal_temperature"),
            status: snapshot
                .get("run_state")
                .and_then(|r| r.value.as_str())
                .unwrap_or("unknown")
                .to_string(),
            timestamp_ms: snapshot.timestamp_ms,
        }
    }
}
