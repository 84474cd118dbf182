//! Append-only event log files.
//!
//! One plain-text file per event family under the configured log
//! directory, one timestamped line per event. These are the files an
//! operator greps after the fact; tracing covers the live view.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;

use crate::config::LogConfig;

/// Event families, each with its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Accepted contact form submissions.
    Submission,
    /// Contact form rejections (validation, rate limit).
    FormError,
    /// CSRF failures, honeypot triggers, hijack heuristics.
    Security,
    /// Database failures.
    Database,
    /// Mail delivery outcomes.
    Email,
    /// Mail delivery failures with transport detail.
    EmailError,
    /// Rate limit violations.
    RateLimit,
}

impl EventKind {
    fn file_name(self) -> &'static str {
        match self {
            EventKind::Submission => "submissions.log",
            EventKind::FormError => "form-errors.log",
            EventKind::Security => "security.log",
            EventKind::Database => "database.log",
            EventKind::Email => "email.log",
            EventKind::EmailError => "email-errors.log",
            EventKind::RateLimit => "ratelimit.log",
        }
    }
}

struct Inner {
    enabled: bool,
    dir: PathBuf,
}

/// Handle to the event log directory. Cheap to clone.
#[derive(Clone)]
pub struct EventLog {
    inner: Arc<Inner>,
}

impl EventLog {
    pub fn new(config: &LogConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                enabled: config.enabled,
                dir: PathBuf::from(&config.path),
            }),
        }
    }

    /// A disabled log that swallows everything. Handy in tests.
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(Inner {
                enabled: false,
                dir: PathBuf::new(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled
    }

    /// Append one timestamped line to the file for `kind`.
    ///
    /// Failures to write are reported via tracing and otherwise swallowed;
    /// logging must never take a request down.
    pub fn write(&self, kind: EventKind, message: &str) {
        if !self.inner.enabled {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{}] {}\n", timestamp, message);

        if let Err(e) = self.append(kind, &line) {
            tracing::warn!(file = kind.file_name(), error = %e, "Event log write failed");
        }
    }

    fn append(&self, kind: EventKind, line: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.inner.dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.inner.dir.join(kind.file_name()))?;
        file.write_all(line.as_bytes())
    }
}
