use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Opaque session token. Minted from a random v4 UUID; inbound values are
/// carried verbatim and only mean something if the store knows them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().as_hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One authenticated browsing session. Every field is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,

    // Free-text member name as typed at login
    pub username: String,

    pub created_at: DateTime<Utc>,
    /// Only set when the store was built with a TTL.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(
        username: impl Into<String>,
        created_at: DateTime<Utc>,
        ttl: Option<chrono::Duration>,
    ) -> Self {
        Self {
            id: SessionId::generate(),
            username: username.into(),
            created_at,
            expires_at: ttl.and_then(|ttl| created_at.checked_add_signed(ttl)),
        }
    }

    /// Returns true if the session has an expiry set and we have reached it.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expiry) => now >= expiry,
            None => false,
        }
    }
}
