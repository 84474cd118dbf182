//! Per-visitor session wrapper.
//!
//! Wraps the cookie-backed `tower-sessions` session and carries the
//! site-level lifecycle rules: the session id is rotated once it is
//! older than the configured interval, and a change of user agent is
//! treated as a hijack heuristic that destroys the session outright.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tower_sessions::Session;

use crate::i18n::Lang;
use crate::observability::{EventKind, EventLog};

pub type Result<T> = std::result::Result<T, tower_sessions::session::Error>;

const KEY_CREATED: &str = "created";
const KEY_USER_AGENT: &str = "user_agent";
const KEY_LANG: &str = "lang";

/// Session handle for one request.
#[derive(Debug, Clone)]
pub struct SiteSession {
    inner: Session,
}

impl SiteSession {
    pub fn new(inner: Session) -> Self {
        Self { inner }
    }

    /// Apply the lifecycle rules for this request.
    ///
    /// Order matters: the hijack check runs first so a stolen cookie
    /// never benefits from a rotation.
    pub async fn prepare(
        &self,
        user_agent: &str,
        now: i64,
        rotate_secs: u64,
        events: &EventLog,
    ) -> Result<()> {
        match self.get::<String>(KEY_USER_AGENT).await? {
            None => {
                self.insert(KEY_USER_AGENT, &user_agent.to_string()).await?;
            }
            Some(stored) if stored != user_agent => {
                events.write(
                    EventKind::Security,
                    &format!("User agent changed mid-session, session destroyed (was: {stored})"),
                );
                tracing::warn!("Session destroyed: user agent mismatch");
                self.inner.flush().await?;
                self.insert(KEY_USER_AGENT, &user_agent.to_string()).await?;
                self.insert(KEY_CREATED, &now).await?;
                return Ok(());
            }
            Some(_) => {}
        }

        match self.get::<i64>(KEY_CREATED).await? {
            None => {
                self.insert(KEY_CREATED, &now).await?;
            }
            Some(created) if now - created > rotate_secs as i64 => {
                self.inner.cycle_id().await?;
                self.insert(KEY_CREATED, &now).await?;
            }
            Some(_) => {}
        }

        Ok(())
    }

    /// Language preference, defaulting to Vietnamese.
    pub async fn lang(&self) -> Result<Lang> {
        Ok(self.get::<Lang>(KEY_LANG).await?.unwrap_or_default())
    }

    pub async fn set_lang(&self, lang: Lang) -> Result<()> {
        self.insert(KEY_LANG, &lang).await
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.inner.get::<T>(key).await
    }

    pub async fn insert<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.inner.insert(key, value).await
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove::<serde_json::Value>(key).await?;
        Ok(())
    }
}
