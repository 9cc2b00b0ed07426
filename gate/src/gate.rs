use std::sync::Arc;

use session::model::{Session, SessionId};
use session::store::SessionStore;
use tracing::{debug, error, info, instrument, warn};

use crate::config::GateConfig;
use crate::credentials::{Credentials, SharedSecret};
use crate::error::GateError;
use crate::transport::SessionTransport;
use crate::verdict::{LoginOutcome, Verdict, messages};

/// Turns credentials and session identifiers into verdicts.
///
/// Per identifier there are two states: unauthenticated (nothing in the store)
/// and authenticated (a session exists). Login moves to the second, logout back
/// to the first. Nothing here times out on its own.
pub struct AuthGate {
    store: Arc<dyn SessionStore>,
    secret: SharedSecret,
}

impl AuthGate {
    pub fn new(store: Arc<dyn SessionStore>, secret: SharedSecret) -> Self {
        Self { store, secret }
    }

    pub fn from_config(store: Arc<dyn SessionStore>, cfg: &GateConfig) -> Self {
        Self::new(store, cfg.secret.clone())
    }

    /// Check the shared password and mint a session for `username`.
    ///
    /// The store is only touched when the password matches. The username is
    /// taken as typed; it is not looked up anywhere.
    #[instrument(skip(self, password), target = "gate")]
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        match self.try_login(username, password).await {
            Ok(session) => {
                info!(session_id = %session.id, "member logged in");
                LoginOutcome {
                    verdict: Verdict::granted(session.username, Some(messages::ACCESS_GRANTED)),
                    session_id: Some(session.id),
                }
            }
            Err(err) => {
                log_rejection(&err);
                LoginOutcome::rejected(err)
            }
        }
    }

    async fn try_login(&self, username: &str, password: &str) -> Result<Session, GateError> {
        Credentials::new(username, password).validate()?;

        if !self.secret.matches(password) {
            return Err(GateError::InvalidCredentials);
        }

        self.store
            .create_session(username)
            .await
            .map_err(GateError::SessionNotCreated)
    }

    /// Resolve an identifier to the member it was issued to.
    #[instrument(skip(self, id), target = "gate", fields(session_id = ?id.map(SessionId::as_str)))]
    pub async fn check_status(&self, id: Option<&SessionId>) -> Verdict {
        match self.resolve(id).await {
            Ok(session) => {
                debug!(username = %session.username, "session resolved");
                Verdict::granted(session.username, None)
            }
            Err(err) => {
                log_rejection(&err);
                err.into()
            }
        }
    }

    async fn resolve(&self, id: Option<&SessionId>) -> Result<Session, GateError> {
        let id = id.ok_or(GateError::Unauthenticated(messages::NO_ACTIVE_SESSION))?;

        let session = self
            .store
            .get_session(id)
            .await
            .map_err(|cause| GateError::Internal {
                message: messages::SERVER_ERROR,
                cause,
            })?;

        session.ok_or(GateError::Unauthenticated(messages::INVALID_SESSION))
    }

    /// End the session behind `id`, if any. Succeeds for unknown or missing
    /// identifiers; only a store failure is reported as an error.
    #[instrument(skip(self, id), target = "gate", fields(session_id = ?id.map(SessionId::as_str)))]
    pub async fn logout(&self, id: Option<&SessionId>) -> Verdict {
        let Some(id) = id else {
            debug!("logout without a session");
            return Verdict::logged_out();
        };

        match self.store.delete_session(id).await {
            Ok(()) => {
                info!("member logged out");
                Verdict::logged_out()
            }
            Err(cause) => {
                let err = GateError::Internal {
                    message: messages::LOGOUT_FAILED,
                    cause,
                };
                log_rejection(&err);
                err.into()
            }
        }
    }

    /// Predicate for content-serving layers: does `id` belong to a live session?
    /// Store failures read as "no".
    pub async fn is_authenticated(&self, id: Option<&SessionId>) -> bool {
        match self.resolve(id).await {
            Ok(_) => true,
            Err(GateError::Internal { cause, .. }) => {
                error!(error = %format!("{cause:#}"), "session lookup failed; denying access");
                false
            }
            Err(_) => false,
        }
    }

    /// `login`, then hand the new identifier to the transport.
    pub async fn login_via<T: SessionTransport>(
        &self,
        transport: &T,
        credentials: &Credentials,
        response: &mut T::Response,
    ) -> Verdict {
        let outcome = self.login(&credentials.username, &credentials.password).await;

        if let Some(id) = &outcome.session_id {
            transport.attach(response, id);
        }

        outcome.verdict
    }

    /// `check_status` on whatever identifier the transport recovers.
    pub async fn status_via<T: SessionTransport>(
        &self,
        transport: &T,
        request: &T::Request,
    ) -> Verdict {
        let id = transport.identifier(request);
        self.check_status(id.as_ref()).await
    }

    /// `logout`, then tell the transport to forget the identifier. The
    /// association is cleared even when the store failed.
    pub async fn logout_via<T: SessionTransport>(
        &self,
        transport: &T,
        request: &T::Request,
        response: &mut T::Response,
    ) -> Verdict {
        let id = transport.identifier(request);
        let verdict = self.logout(id.as_ref()).await;

        transport.clear(response);
        verdict
    }
}

fn log_rejection(err: &GateError) {
    match err {
        GateError::Validation(_) | GateError::InvalidCredentials => {
            warn!(reason = %err, "login rejected")
        }
        GateError::Unauthenticated(_) => debug!(reason = %err, "not authenticated"),
        GateError::SessionNotCreated(_) | GateError::Internal { .. } => {
            error!(error = %err, "session store failure")
        }
    }
}
