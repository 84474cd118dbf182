//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, windows > 0)
//! - Check the bind address parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate semantic constraints on a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "server.bind_address",
            message: format!("not a valid socket address: {}", config.server.bind_address),
        });
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "server.request_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.rate_limit.enabled && config.rate_limit.max_attempts == 0 {
        errors.push(ValidationError {
            field: "rate_limit.max_attempts",
            message: "must be greater than zero when rate limiting is enabled".to_string(),
        });
    }

    if config.rate_limit.enabled && config.rate_limit.window_secs == 0 {
        errors.push(ValidationError {
            field: "rate_limit.window_secs",
            message: "must be greater than zero when rate limiting is enabled".to_string(),
        });
    }

    if config.csrf.token_expire_secs == 0 {
        errors.push(ValidationError {
            field: "csrf.token_expire_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    match config.session.same_site.as_str() {
        "Strict" | "Lax" | "None" => {}
        other => errors.push(ValidationError {
            field: "session.same_site",
            message: format!("expected Strict, Lax or None, got {}", other),
        }),
    }

    if !config.smtp.host.is_empty() && config.smtp.port == 0 {
        errors.push(ValidationError {
            field: "smtp.port",
            message: "must be greater than zero when an SMTP host is set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = AppConfig::default();
        config.server.bind_address = "nonsense".to_string();
        config.rate_limit.max_attempts = 0;
        config.session.same_site = "Sideways".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
