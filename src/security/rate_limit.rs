//! Per-visitor rate limiting for form submissions.
//!
//! Counters live in the visitor's session, keyed by a hash of
//! (identifier, action). The first recorded attempt seeds a reset
//! timestamp one window ahead; once the window elapses the counter
//! resets transparently on the next check. Only successful submissions
//! are recorded, so rejected posts do not consume the budget.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::RateLimitConfig;
use crate::session::SiteSession;

const SESSION_KEY: &str = "rate_limit";

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    /// Rejected; retry after this many whole minutes.
    Limited { retry_minutes: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Window {
    attempts: u32,
    reset_at: i64,
}

/// Counter state stored in the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLimitState {
    windows: HashMap<String, Window>,
}

impl RateLimitState {
    fn key(identifier: &str, action: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(identifier.as_bytes());
        hasher.update(b"_");
        hasher.update(action.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Attempts inside the current window, resetting an elapsed one.
    fn attempts(&mut self, key: &str, now: i64) -> u32 {
        match self.windows.get(key) {
            Some(window) if now >= window.reset_at => {
                self.windows.remove(key);
                0
            }
            Some(window) => window.attempts,
            None => 0,
        }
    }

    /// Check whether another attempt is allowed. May mutate (window reset).
    pub fn check(&mut self, identifier: &str, action: &str, now: i64, max_attempts: u32) -> RateDecision {
        let key = Self::key(identifier, action);
        if self.attempts(&key, now) >= max_attempts {
            let reset_at = self.windows.get(&key).map(|w| w.reset_at).unwrap_or(now);
            let remaining = (reset_at - now).max(0) as u64;
            return RateDecision::Limited {
                retry_minutes: remaining.div_ceil(60),
            };
        }
        RateDecision::Allowed
    }

    /// Record one attempt, seeding the reset timestamp on first use.
    pub fn record(&mut self, identifier: &str, action: &str, now: i64, window_secs: u64) {
        let key = Self::key(identifier, action);
        let window = self.windows.entry(key).or_insert(Window {
            attempts: 0,
            reset_at: now + window_secs as i64,
        });
        window.attempts += 1;
    }
}

/// Session-backed rate limiter for one action family.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Check the visitor's budget for `action`.
    pub async fn check(
        &self,
        session: &SiteSession,
        identifier: &str,
        action: &str,
        now: i64,
    ) -> crate::session::Result<RateDecision> {
        if !self.config.enabled {
            return Ok(RateDecision::Allowed);
        }

        let mut state = session
            .get::<RateLimitState>(SESSION_KEY)
            .await?
            .unwrap_or_default();
        let decision = state.check(identifier, action, now, self.config.max_attempts);
        session.insert(SESSION_KEY, &state).await?;
        Ok(decision)
    }

    /// Record a successful attempt against the budget.
    pub async fn record(
        &self,
        session: &SiteSession,
        identifier: &str,
        action: &str,
        now: i64,
    ) -> crate::session::Result<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let mut state = session
            .get::<RateLimitState>(SESSION_KEY)
            .await?
            .unwrap_or_default();
        state.record(identifier, action, now, self.config.window_secs);
        session.insert(SESSION_KEY, &state).await?;
        Ok(())
    }
}
