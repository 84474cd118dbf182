//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! AppConfig [database]
//!     → client.rs (pool construction, schema bootstrap, thin helpers)
//!     → submissions.rs (contact_submissions repository)
//! ```
//!
//! # Design Decisions
//! - The client is constructed once in main and injected through the
//!   app state; no singleton
//! - sqlx Any driver: MySQL in production, SQLite in tests
//! - Failures are logged to database.log; callers show a generic message

pub mod client;
pub mod submissions;

pub use client::{Database, DbError};
pub use submissions::{
    count_submissions, fetch_recent, insert_submission, NewSubmission, SubmissionPriority,
    SubmissionRow, SubmissionStatus,
};
