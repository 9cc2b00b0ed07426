use std::sync::Arc;

use gate::AuthGate;
use session::store::{MemorySessionStore, SQLiteSessionStore, SessionStore};
use tracing::info;

use crate::config::AppConfig;
use crate::cookie::CookieTransport;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
    pub transport: Arc<CookieTransport>,
}

impl AppState {
    pub fn new(gate: AuthGate, transport: CookieTransport) -> Self {
        Self {
            gate: Arc::new(gate),
            transport: Arc::new(transport),
        }
    }

    pub async fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let store = build_store(cfg).await?;
        let gate = AuthGate::from_config(store, &cfg.gate);

        Ok(Self::new(gate, CookieTransport::new(&cfg.cookie)))
    }
}

/// SQLite when `DATABASE_URL` is set, memory otherwise.
pub async fn build_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn SessionStore>> {
    let ttl_secs = cfg.session_ttl.map(|t| t.as_secs());

    match &cfg.database_url {
        Some(url) => {
            let mut store = SQLiteSessionStore::new(url).await?;
            if let Some(ttl) = cfg.session_ttl {
                store = store.with_ttl(ttl);
            }
            info!(backend = "sqlite", ttl_secs, "session store ready");
            Ok(Arc::new(store))
        }
        None => {
            let store = match cfg.session_ttl {
                Some(ttl) => MemorySessionStore::with_ttl(ttl),
                None => MemorySessionStore::new(),
            };
            info!(backend = "memory", ttl_secs, "session store ready");
            Ok(Arc::new(store))
        }
    }
}
