//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the site.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the website.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Site identity (name, canonical URL, debug flag).
    pub site: SiteConfig,

    /// Relational database connection settings.
    pub database: DatabaseConfig,

    /// Sender / recipient addresses for outgoing mail.
    pub mail: MailConfig,

    /// SMTP relay settings. An empty host selects the local transport.
    pub smtp: SmtpConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// CSRF token settings.
    pub csrf: CsrfConfig,

    /// Contact form rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Event log files.
    pub log: LogConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Site identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Display name used in page titles and email bodies.
    pub name: String,

    /// Canonical site URL.
    pub url: String,

    /// Debug flag. Enables verbose user-facing error detail.
    pub debug: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "La TRUNG Printing & Packaging".to_string(),
            url: "https://www.latrungprint.vn".to_string(),
            debug: false,
        }
    }
}

/// Database connection configuration.
///
/// When `url` is set it is used verbatim (tests use `sqlite::memory:`);
/// otherwise a MySQL URL is assembled from the individual parts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Explicit connection URL override.
    pub url: Option<String>,

    /// Database host.
    pub host: String,

    /// Database name.
    pub name: String,

    /// Database user.
    pub user: String,

    /// Database password.
    pub password: String,

    /// Connection charset.
    pub charset: String,

    /// Maximum pool connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            name: "latrung_website".to_string(),
            user: String::new(),
            password: String::new(),
            charset: "utf8mb4".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// Connection URL: the explicit override, or one built from the parts.
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        format!(
            "mysql://{}:{}@{}/{}?charset={}",
            self.user, self.password, self.host, self.name, self.charset
        )
    }
}

/// Outgoing mail addresses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    /// Envelope / header From address.
    pub from_email: String,

    /// Display name for the From header.
    pub from_name: String,

    /// Address that receives admin notifications.
    pub to_email: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_email: "info@latrungprint.vn".to_string(),
            from_name: "La TRUNG Printing & Packaging".to_string(),
            to_email: "info@latrungprint.vn".to_string(),
        }
    }
}

/// Connection security for the SMTP relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpEncryption {
    /// Plain TCP, no TLS upgrade.
    None,
    /// Plain TCP upgraded via STARTTLS (port 587).
    #[default]
    Tls,
    /// Implicit TLS from the first byte (port 465).
    Ssl,
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Relay host. Empty disables SMTP and selects the local transport.
    pub host: String,

    /// Relay port.
    pub port: u16,

    /// Relay user. Empty skips AUTH.
    pub user: String,

    /// Relay password.
    pub password: String,

    /// Connection security.
    pub encryption: SmtpEncryption,

    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Per-read timeout in seconds.
    pub io_timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            user: String::new(),
            password: String::new(),
            encryption: SmtpEncryption::Tls,
            connect_timeout_secs: 30,
            io_timeout_secs: 30,
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Only send the cookie over HTTPS.
    pub secure: bool,

    /// Hide the cookie from JavaScript.
    pub http_only: bool,

    /// SameSite attribute ("Strict", "Lax", "None").
    pub same_site: String,

    /// Rotate the session id after this many seconds.
    pub rotate_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secure: true,
            http_only: true,
            same_site: "Strict".to_string(),
            rotate_secs: 1800,
        }
    }
}

/// CSRF token configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// Token lifetime in seconds.
    pub token_expire_secs: u64,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            token_expire_secs: 3600,
        }
    }
}

/// Contact form rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum successful submissions per window.
    pub max_attempts: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            window_secs: 3600,
        }
    }
}

/// Event log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Enable the append-only event log files.
    pub enabled: bool,

    /// Directory the log files are written to.
    pub path: String,

    /// Log level for the tracing subscriber (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "logs".to_string(),
            level: "info".to_string(),
        }
    }
}
