//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Contact form POST:
//!     → csrf.rs (token verify, fail closed with 403)
//!     → rate_limit.rs (per-visitor attempt counters)
//!     → Pass to validation and persistence
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - State lives in the visitor's session, not in globals
//! - Constant-time token comparison

pub mod csrf;
pub mod rate_limit;

pub use csrf::CsrfGuard;
pub use rate_limit::{RateDecision, RateLimiter};
