use std::sync::Arc;

use tokio::test;

use gate::verdict::messages;
use gate::{AuthGate, Credentials, GateConfig, SharedSecret, StatusClass};
use session::model::SessionId;
use session::store::{MemorySessionStore, SessionStore};

use mock_store::FailingStore;
use mock_transport::{FakeRequest, FakeResponse, RecordingTransport};

const PASSWORD: &str = "MJP-HHB1";

fn gate_with_store() -> (AuthGate, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let gate = AuthGate::new(store.clone(), SharedSecret::new(PASSWORD));
    (gate, store)
}

#[test]
async fn login_status_logout_round_trip() {
    let (gate, store) = gate_with_store();

    let outcome = gate.login("ana", PASSWORD).await;
    assert!(outcome.verdict.success);
    assert_eq!(outcome.verdict.username.as_deref(), Some("ana"));
    assert_eq!(outcome.verdict.message.as_deref(), Some(messages::ACCESS_GRANTED));
    assert_eq!(outcome.verdict.status, StatusClass::Ok);

    let id = outcome.session_id.expect("login should mint an identifier");
    assert_eq!(store.len(), 1);

    let status = gate.check_status(Some(&id)).await;
    assert!(status.success);
    assert_eq!(status.username.as_deref(), Some("ana"));
    assert!(status.message.is_none());

    let out = gate.logout(Some(&id)).await;
    assert!(out.success);
    assert_eq!(out.message.as_deref(), Some(messages::LOGGED_OUT));

    let after = gate.check_status(Some(&id)).await;
    assert!(!after.success);
    assert_eq!(after.status, StatusClass::Unauthorized);
    assert_eq!(after.message.as_deref(), Some(messages::INVALID_SESSION));
    assert!(store.is_empty());
}

#[test]
async fn wrong_password_is_rejected_without_touching_store() {
    let (gate, store) = gate_with_store();

    let earlier = gate.login("luis", PASSWORD).await.session_id.unwrap();

    for bad in ["wrong", "mjp-hhb1", "MJP-HHB1 ", " MJP-HHB1", "MJP-HHB"] {
        let outcome = gate.login("ana", bad).await;
        assert!(!outcome.verdict.success);
        assert!(outcome.session_id.is_none());
        assert_eq!(outcome.verdict.status, StatusClass::Unauthorized);
        assert_eq!(outcome.verdict.message.as_deref(), Some(messages::WRONG_PASSWORD));
    }

    assert_eq!(store.len(), 1);

    // Earlier sessions are unaffected by failed logins
    let status = gate.check_status(Some(&earlier)).await;
    assert_eq!(status.username.as_deref(), Some("luis"));
}

#[test]
async fn empty_fields_are_validation_failures() {
    let (gate, store) = gate_with_store();

    let no_user = gate.login("", PASSWORD).await.verdict;
    assert!(!no_user.success);
    assert_eq!(no_user.status, StatusClass::BadRequest);
    assert_eq!(no_user.message.as_deref(), Some(messages::USERNAME_REQUIRED));

    let no_pass = gate.login("ana", "").await.verdict;
    assert_eq!(no_pass.status, StatusClass::BadRequest);
    assert_eq!(no_pass.message.as_deref(), Some(messages::PASSWORD_REQUIRED));

    assert!(store.is_empty());
}

#[test]
async fn status_without_identifier_is_unauthenticated() {
    let (gate, _) = gate_with_store();

    let v = gate.check_status(None).await;
    assert!(!v.success);
    assert_eq!(v.status, StatusClass::Unauthorized);
    assert_eq!(v.message.as_deref(), Some(messages::NO_ACTIVE_SESSION));
}

#[test]
async fn never_issued_identifier_is_invalid_session() {
    let (gate, _) = gate_with_store();

    let v = gate.check_status(Some(&SessionId::from("forged-token"))).await;
    assert!(!v.success);
    assert_eq!(v.message.as_deref(), Some(messages::INVALID_SESSION));
}

#[test]
async fn logout_never_fails_for_missing_sessions() {
    let (gate, _) = gate_with_store();
    let id = gate.login("ana", PASSWORD).await.session_id.unwrap();

    assert!(gate.logout(Some(&id)).await.success);
    assert!(gate.logout(Some(&id)).await.success);
    assert!(gate.logout(Some(&SessionId::from("never-issued"))).await.success);
    assert!(gate.logout(None).await.success);
}

#[test]
async fn logins_never_share_a_session() {
    let (gate, store) = gate_with_store();

    let a = gate.login("ana", PASSWORD).await.session_id.unwrap();
    let b = gate.login("ana", PASSWORD).await.session_id.unwrap();
    assert_ne!(a, b);
    assert_eq!(store.len(), 2);

    // Logging one out leaves the other alive
    gate.logout(Some(&a)).await;
    assert!(!gate.check_status(Some(&a)).await.success);
    assert!(gate.check_status(Some(&b)).await.success);
}

#[test]
async fn username_is_taken_as_typed() {
    let (gate, _) = gate_with_store();

    let name = "  Ana María 🌸 ";
    let id = gate.login(name, PASSWORD).await.session_id.unwrap();

    assert_eq!(gate.check_status(Some(&id)).await.username.as_deref(), Some(name));
}

#[test]
async fn is_authenticated_tracks_session_lifecycle() {
    let (gate, _) = gate_with_store();

    assert!(!gate.is_authenticated(None).await);

    let id = gate.login("ana", PASSWORD).await.session_id.unwrap();
    assert!(gate.is_authenticated(Some(&id)).await);

    gate.logout(Some(&id)).await;
    assert!(!gate.is_authenticated(Some(&id)).await);
}

#[test]
async fn store_failures_are_reported_without_minting_sessions() {
    let store = Arc::new(FailingStore::default());
    let gate = AuthGate::new(store.clone(), SharedSecret::new(PASSWORD));
    let id = SessionId::from("anything");

    let login = gate.login("ana", PASSWORD).await;
    assert!(!login.verdict.success);
    assert!(login.session_id.is_none());
    // A failed mint at login reads as a rejected request
    assert_eq!(login.verdict.status, StatusClass::BadRequest);
    assert_eq!(login.verdict.message.as_deref(), Some(messages::INVALID_REQUEST));

    let status = gate.check_status(Some(&id)).await;
    assert_eq!(status.status, StatusClass::ServerError);
    assert_eq!(status.message.as_deref(), Some(messages::SERVER_ERROR));

    let logout = gate.logout(Some(&id)).await;
    assert!(!logout.success);
    assert_eq!(logout.status, StatusClass::ServerError);
    assert_eq!(logout.message.as_deref(), Some(messages::LOGOUT_FAILED));

    assert!(!gate.is_authenticated(Some(&id)).await);

    // Bad passwords and absent ids never reach the store
    let before = store.calls();
    gate.login("ana", "wrong").await;
    gate.check_status(None).await;
    gate.logout(None).await;
    assert_eq!(store.calls(), before);
}

#[test]
async fn transport_is_told_to_attach_and_clear() {
    let (gate, _) = gate_with_store();
    let transport = RecordingTransport;

    let mut resp = FakeResponse::default();
    let v = gate
        .login_via(&transport, &Credentials::new("ana", PASSWORD), &mut resp)
        .await;
    assert!(v.success);
    let id = resp.attached.clone().expect("identifier attached on success");

    let req = FakeRequest::with(&id);
    let status = gate.status_via(&transport, &req).await;
    assert_eq!(status.username.as_deref(), Some("ana"));

    let mut resp = FakeResponse::default();
    let out = gate.logout_via(&transport, &req, &mut resp).await;
    assert!(out.success);
    assert!(resp.cleared);

    assert!(!gate.status_via(&transport, &req).await.success);
    assert!(!gate.status_via(&transport, &FakeRequest::default()).await.success);
}

#[test]
async fn failed_login_attaches_nothing() {
    let (gate, _) = gate_with_store();
    let transport = RecordingTransport;

    let mut resp = FakeResponse::default();
    let v = gate
        .login_via(&transport, &Credentials::new("ana", "wrong"), &mut resp)
        .await;

    assert!(!v.success);
    assert!(resp.attached.is_none());
    assert!(!resp.cleared);
}

#[test]
async fn logout_clears_transport_even_on_store_failure() {
    let gate = AuthGate::new(Arc::new(FailingStore::default()), SharedSecret::new(PASSWORD));
    let transport = RecordingTransport;

    let req = FakeRequest {
        sid: Some("stale".into()),
    };
    let mut resp = FakeResponse::default();
    let v = gate.logout_via(&transport, &req, &mut resp).await;

    assert!(!v.success);
    assert!(resp.cleared);
}

#[test]
async fn gate_uses_configured_secret() {
    let cfg = GateConfig::from_lookup(|k| (k == "MEMBER_PASSWORD").then(|| "otra-clave".to_string()));
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let gate = AuthGate::from_config(store, &cfg);

    assert!(!gate.login("ana", PASSWORD).await.verdict.success);
    assert!(gate.login("ana", "otra-clave").await.verdict.success);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_logins_resolve_independently() {
    let (gate, store) = gate_with_store();
    let gate = Arc::new(gate);

    let mut handles = Vec::new();
    for name in ["ana", "luis", "marta", "pablo"] {
        let g = Arc::clone(&gate);
        handles.push(tokio::spawn(async move {
            let id = g.login(name, PASSWORD).await.session_id.unwrap();
            (name, id)
        }));
    }

    let mut results = Vec::new();
    for h in handles {
        results.push(h.await.expect("task panicked"));
    }

    assert_eq!(store.len(), 4);
    for (name, id) in &results {
        let v = gate.check_status(Some(id)).await;
        assert_eq!(v.username.as_deref(), Some(*name));
    }
}
