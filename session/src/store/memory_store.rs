use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use super::{SessionStore, ttl_to_delta};
use crate::model::{Session, SessionId};

/// Process-lifetime session map. Everything is lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    map: Mutex<HashMap<SessionId, Session>>,
    ttl: Option<chrono::Duration>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions older than `ttl` read as absent and are dropped on lookup.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
            ttl: Some(ttl_to_delta(ttl)),
        }
    }

    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.lock().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    #[instrument(skip(self), target = "store")]
    async fn create_session(&self, username: &str) -> anyhow::Result<Session> {
        let session = Session::new(username, Utc::now(), self.ttl);

        let size = {
            let mut map = self.map.lock();
            map.insert(session.id.clone(), session.clone());
            map.len()
        };

        info!(session_id = %session.id, size, "session created");
        Ok(session)
    }

    #[instrument(skip(self), target = "store", fields(session_id = %id))]
    async fn get_session(&self, id: &SessionId) -> anyhow::Result<Option<Session>> {
        let mut map = self.map.lock();

        let expired = match map.get(id) {
            None => {
                debug!("session not found");
                return Ok(None);
            }
            Some(s) => s.is_expired(Utc::now()),
        };

        if expired {
            map.remove(id);
            info!("session expired; evicted on lookup");
            return Ok(None);
        }

        Ok(map.get(id).cloned())
    }

    #[instrument(skip(self), target = "store", fields(session_id = %id))]
    async fn delete_session(&self, id: &SessionId) -> anyhow::Result<()> {
        let removed = self.map.lock().remove(id).is_some();
        debug!(removed, "session delete");
        Ok(())
    }
}
