use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use gate::GateConfig;

#[derive(Clone, Debug)]
pub struct CookieConfig {
    /// Name of the cookie carrying the session identifier.
    pub name: String,
    pub max_age_secs: u64,
    /// Only send over HTTPS. Off by default for local development.
    pub secure: bool,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,

    pub gate: GateConfig,
    pub cookie: CookieConfig,

    // =========================
    // Session storage
    // =========================
    /// `sqlite:` URL. When unset, sessions live in memory and die with the process.
    pub database_url: Option<String>,

    /// Store-side session lifetime. When unset, only the cookie's own max-age
    /// bounds a session.
    pub session_ttl: Option<Duration>,

    /// Emit JSON logs (production) instead of pretty ones.
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr =
            parse(&get, "BIND_ADDR")?.unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)));

        let cookie = CookieConfig {
            name: get("SESSION_COOKIE_NAME").unwrap_or_else(|| "member_sid".to_string()),
            // 24h, same as the browser session it replaces
            max_age_secs: parse(&get, "SESSION_COOKIE_MAX_AGE_SECS")?.unwrap_or(24 * 60 * 60),
            secure: parse(&get, "SESSION_COOKIE_SECURE")?.unwrap_or(false),
        };

        if !is_cookie_token(&cookie.name) {
            anyhow::bail!("invalid SESSION_COOKIE_NAME: {:?}", cookie.name);
        }

        let session_ttl = parse::<u64, _>(&get, "SESSION_TTL_SECS")?.map(Duration::from_secs);

        Ok(Self {
            bind_addr,
            gate: GateConfig::from_lookup(&lookup),
            cookie,
            database_url: get("DATABASE_URL"),
            session_ttl,
            json_logs: get("APP_ENV").as_deref() == Some("production"),
        })
    }
}

fn parse<T, F>(get: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid {key}={raw:?}: {e}")),
    }
}

fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}
