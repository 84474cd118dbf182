//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events to stdout)
//!     → events.rs (append-only per-event log files)
//!
//! Consumers:
//!     → Operator tailing logs/ (submissions, security, email, ...)
//!     → Log aggregation via the tracing subscriber
//! ```
//!
//! # Design Decisions
//! - tracing for operator-facing structured logs
//! - One plain-text file per event family, one timestamped line per event
//! - The event files can be disabled wholesale from config

pub mod events;
pub mod logging;

pub use events::{EventKind, EventLog};
pub use logging::init_tracing;
