use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::logger::{TraceId, root_span};
use gate::verdict::messages;
use gate::{Credentials, StatusClass, Verdict};
use tracing::{Instrument, warn};

use crate::state::AppState;

/// Auth endpoints plus a liveness probe.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/status", get(status))
        .route("/api/auth/logout", post(logout))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Response {
    let trace_id = TraceId::new();

    async move {
        let mut headers = HeaderMap::new();

        let verdict = match payload {
            Ok(Json(credentials)) => {
                state
                    .gate
                    .login_via(state.transport.as_ref(), &credentials, &mut headers)
                    .await
            }
            Err(rejection) => {
                warn!(error = %rejection, "malformed login body");
                Verdict::denied(StatusClass::BadRequest, messages::INVALID_REQUEST)
            }
        };

        respond(verdict, headers)
    }
    .instrument(root_span("auth.login", &trace_id))
    .await
}

async fn status(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let trace_id = TraceId::new();

    async move {
        let verdict = state.gate.status_via(state.transport.as_ref(), &headers).await;
        respond(verdict, HeaderMap::new())
    }
    .instrument(root_span("auth.status", &trace_id))
    .await
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let trace_id = TraceId::new();

    async move {
        let mut out = HeaderMap::new();
        let verdict = state
            .gate
            .logout_via(state.transport.as_ref(), &headers, &mut out)
            .await;
        respond(verdict, out)
    }
    .instrument(root_span("auth.logout", &trace_id))
    .await
}

fn respond(verdict: Verdict, headers: HeaderMap) -> Response {
    let code =
        StatusCode::from_u16(verdict.status.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, headers, Json(verdict)).into_response()
}
