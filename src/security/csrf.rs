//! CSRF token issue and verification.
//!
//! Token = 32 random bytes, hex-encoded, stored in the session together
//! with its issue time. A token older than the configured expiry is
//! discarded and verification fails closed. Comparison is constant-time.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::config::CsrfConfig;
use crate::session::SiteSession;

const SESSION_KEY: &str = "csrf_token";

/// Stored token state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfToken {
    pub value: String,
    pub issued_at: i64,
}

impl CsrfToken {
    fn generate(now: i64) -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self {
            value: hex::encode(bytes),
            issued_at: now,
        }
    }

    fn is_expired(&self, now: i64, expire_secs: u64) -> bool {
        now - self.issued_at > expire_secs as i64
    }

    fn matches(&self, candidate: &str) -> bool {
        self.value.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

/// Issues and verifies per-session CSRF tokens.
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    expire_secs: u64,
}

impl CsrfGuard {
    pub fn new(config: &CsrfConfig) -> Self {
        Self {
            expire_secs: config.token_expire_secs,
        }
    }

    /// Current token for the session, minting a fresh one when absent
    /// or expired.
    pub async fn issue(&self, session: &SiteSession, now: i64) -> crate::session::Result<String> {
        if let Some(token) = session.get::<CsrfToken>(SESSION_KEY).await? {
            if !token.is_expired(now, self.expire_secs) {
                return Ok(token.value);
            }
        }

        let token = CsrfToken::generate(now);
        let value = token.value.clone();
        session.insert(SESSION_KEY, &token).await?;
        Ok(value)
    }

    /// Verify a submitted token against the session state.
    ///
    /// Expired state is cleared so the next issue mints a new token.
    pub async fn verify(
        &self,
        session: &SiteSession,
        candidate: &str,
        now: i64,
    ) -> crate::session::Result<bool> {
        let Some(token) = session.get::<CsrfToken>(SESSION_KEY).await? else {
            return Ok(false);
        };

        if token.is_expired(now, self.expire_secs) {
            session.remove(SESSION_KEY).await?;
            return Ok(false);
        }

        Ok(token.matches(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_64_hex_chars() {
        let token = CsrfToken::generate(1_000);
        assert_eq!(token.value.len(), 64);
        assert!(token.value.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(CsrfToken::generate(0).value, CsrfToken::generate(0).value);
    }

    #[test]
    fn expiry_window() {
        let token = CsrfToken::generate(1_000);
        assert!(!token.is_expired(1_000 + 3600, 3600));
        assert!(token.is_expired(1_000 + 3601, 3600));
    }

    #[test]
    fn comparison_is_exact() {
        let token = CsrfToken::generate(0);
        let value = token.value.clone();
        assert!(token.matches(&value));
        assert!(!token.matches(&value[..63]));
        assert!(!token.matches(""));
        let mut wrong = value.into_bytes();
        wrong[0] = if wrong[0] == b'0' { b'1' } else { b'0' };
        assert!(!token.matches(std::str::from_utf8(&wrong).unwrap()));
    }
}
