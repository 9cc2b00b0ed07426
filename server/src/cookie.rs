use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use gate::SessionTransport;
use session::model::SessionId;
use tracing::error;

use crate::config::CookieConfig;

/// Carries the session identifier in an `HttpOnly` cookie.
#[derive(Clone, Debug)]
pub struct CookieTransport {
    name: String,
    max_age_secs: u64,
    secure: bool,
}

impl CookieTransport {
    pub fn new(cfg: &CookieConfig) -> Self {
        Self {
            name: cfg.name.clone(),
            max_age_secs: cfg.max_age_secs,
            secure: cfg.secure,
        }
    }

    fn set_cookie(&self, value: &str, max_age_secs: u64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            self.name, value, max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

impl SessionTransport for CookieTransport {
    type Request = HeaderMap;
    type Response = HeaderMap;

    fn identifier(&self, request: &HeaderMap) -> Option<SessionId> {
        parse_cookie(request, &self.name).map(SessionId::from)
    }

    fn attach(&self, response: &mut HeaderMap, id: &SessionId) {
        match HeaderValue::from_str(&self.set_cookie(id.as_str(), self.max_age_secs)) {
            Ok(v) => {
                response.append(SET_COOKIE, v);
            }
            Err(e) => error!(error = %e, "session id is not a valid cookie value"),
        }
    }

    fn clear(&self, response: &mut HeaderMap) {
        if let Ok(v) = HeaderValue::from_str(&self.set_cookie("", 0)) {
            response.append(SET_COOKIE, v);
        }
    }
}

/// Find `name` across every `Cookie` header. Empty values count as absent.
fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
