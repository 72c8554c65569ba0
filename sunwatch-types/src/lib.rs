//! # sunwatch-types
//!
//! Core types for solar inverter telemetry. This crate defines the wire
//! schema shared between the telemetry core, its producer, and whatever
//! transport layer (HTTP, WebSocket, ...) is layered on top.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature as needed
//! - **Immutable records**: Readings, snapshots, and history points never mutate in place,
//!   so concurrent readers can hold them without synchronization
//!
//! ## Example
//!
//! ```rust
//! use sunwatch_types::{RegisterReading, Snapshot, SystemStatus};
//!
//! let snapshot = Snapshot::builder()
//!     .timestamp_ms(1703160000000)
//!     .status(SystemStatus::Healthy)
//!     .reading("total_active_power", RegisterReading::numeric(4200.0, "W", 5031))
//!     .reading("run_state", RegisterReading::text("ON", "", 5038))
//!     .build();
//!
//! assert_eq!(snapshot.len(), 2);
//! ```

mod reading;
mod snapshot;
mod status;
mod stream;
mod version;

pub use reading::*;
pub use snapshot::*;
pub use status::*;
pub use stream::*;
pub use version::*;
