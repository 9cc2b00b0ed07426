//! SQLiteSessionStore
//! --------------------
//! A **SQLite-backed implementation** of the `SessionStore` trait. It lets
//! member sessions survive a restart of the process, which the in-memory store
//! does not. The gate is unaware of which backend it talks to.
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, instrument};

use super::{SessionStore, ttl_to_delta};
use crate::model::{Session, SessionId};

/// SQLite-based persistence backend for sessions.
///
///   - schema creation on startup (`new`)
///   - inserts on `create_session`
///   - point lookups with lazy expiry on `get_session`
///   - idempotent removal on `delete_session`
pub struct SQLiteSessionStore {
    pool: SqlitePool,
    ttl: Option<chrono::Duration>,
}

impl SQLiteSessionStore {
    /// Wrap an existing pool. The schema is assumed to be migrated.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool, ttl: None }
    }

    /// Connect to `url` and ensure the schema exists. A missing database file
    /// is created.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid session database url {url}"))?
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to open session database at {url}"))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                created_at_ms INTEGER NOT NULL,
                expires_at_ms INTEGER
            );
        "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool, ttl: None })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl_to_delta(ttl));
        self
    }

    pub async fn count(&self) -> anyhow::Result<usize> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await?;
        Ok(n as usize)
    }
}

#[async_trait]
impl SessionStore for SQLiteSessionStore {
    #[instrument(skip(self), target = "store")]
    async fn create_session(&self, username: &str) -> anyhow::Result<Session> {
        let session = Session::new(username, Utc::now(), self.ttl);

        sqlx::query(
            "INSERT INTO sessions (id, username, created_at_ms, expires_at_ms) VALUES (?, ?, ?, ?)",
        )
        .bind(session.id.as_str())
        .bind(&session.username)
        .bind(session.created_at.timestamp_millis())
        .bind(session.expires_at.map(|t| t.timestamp_millis()))
        .execute(&self.pool)
        .await
        .context("failed to insert session")?;

        info!(session_id = %session.id, "session created");
        Ok(session)
    }

    #[instrument(skip(self), target = "store", fields(session_id = %id))]
    async fn get_session(&self, id: &SessionId) -> anyhow::Result<Option<Session>> {
        let row = sqlx::query(
            "SELECT id, username, created_at_ms, expires_at_ms FROM sessions WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("failed to look up session")?;

        let Some(row) = row else {
            debug!("session not found");
            return Ok(None);
        };

        let session = row_to_session(&row)?;

        if session.is_expired(Utc::now()) {
            self.delete_session(id).await?;
            info!("session expired; evicted on lookup");
            return Ok(None);
        }

        Ok(Some(session))
    }

    #[instrument(skip(self), target = "store", fields(session_id = %id))]
    async fn delete_session(&self, id: &SessionId) -> anyhow::Result<()> {
        let res = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .context("failed to delete session")?;

        debug!(removed = res.rows_affected(), "session delete");
        Ok(())
    }
}

fn row_to_session(row: &SqliteRow) -> anyhow::Result<Session> {
    let id: String = row.get("id");
    let created_at_ms: i64 = row.get("created_at_ms");
    let expires_at_ms: Option<i64> = row.get("expires_at_ms");

    Ok(Session {
        id: SessionId::from(id),
        username: row.get("username"),
        created_at: millis_to_utc(created_at_ms)?,
        expires_at: expires_at_ms.map(millis_to_utc).transpose()?,
    })
}

fn millis_to_utc(ms: i64) -> anyhow::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| anyhow::anyhow!("timestamp out of range: {ms}"))
}
