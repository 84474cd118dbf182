//! La TRUNG company website library.

pub mod config;
pub mod db;
pub mod http;
pub mod i18n;
pub mod mail;
pub mod observability;
pub mod security;
pub mod session;
pub mod views;

pub use config::AppConfig;
pub use http::HttpServer;
