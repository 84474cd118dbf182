//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → server.rs (Axum setup, session/trace/timeout layers)
//!     → pages.rs (static pages, language switch, 404)
//!     → contact.rs (form GET/POST pipeline)
//!     → views (rendered HTML)
//! ```

pub mod contact;
pub mod error;
pub mod pages;
pub mod server;

pub use error::AppError;
pub use server::{AppState, HttpServer};
