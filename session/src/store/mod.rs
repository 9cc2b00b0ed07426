pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemorySessionStore;
pub use sqlite_store::SQLiteSessionStore;

use crate::model::{Session, SessionId};

/// Backing storage for login sessions.
///
/// Each call is a single atomic mapping update. A missing id is not an error:
/// `get_session` yields `None` and `delete_session` is a no-op.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Mint a new session for `username` and record it.
    async fn create_session(&self, username: &str) -> anyhow::Result<Session>;
    async fn get_session(&self, id: &SessionId) -> anyhow::Result<Option<Session>>;
    async fn delete_session(&self, id: &SessionId) -> anyhow::Result<()>;
}

pub(crate) fn ttl_to_delta(ttl: std::time::Duration) -> chrono::Duration {
    chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX)
}
