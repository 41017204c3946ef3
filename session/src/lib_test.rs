use super::*;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

fn token_for(username: &str) -> String {
    let payload = serde_json::json!({ "sub": 1, "username": username, "role": "user", "exp": 4_000_000_000_u64 });
    format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload.to_string()))
}

/// Store whose reads and clears always fail.
struct BrokenStore;

impl TokenStore for BrokenStore {
    fn save(&self, _token: &str) -> Result<(), StoreError> {
        Err(broken())
    }

    fn get(&self) -> Result<Option<String>, StoreError> {
        Err(broken())
    }

    fn clear(&self) -> Result<(), StoreError> {
        Err(broken())
    }
}

fn broken() -> StoreError {
    StoreError::Io {
        path: "broken".into(),
        source: std::io::Error::other("disk gone"),
    }
}

// =============================================================================
// status + guard
// =============================================================================

#[test]
fn fresh_session_is_unauthenticated_and_redirects() {
    let session = Session::in_memory();
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert_eq!(session.guard(), GuardDecision::Redirect(Route::Login));
    assert_eq!(session.token(), None);
}

#[test]
fn login_makes_session_authenticated() {
    let session = Session::in_memory();
    session.login("abc.def.ghi").unwrap();
    assert_eq!(session.status(), AuthStatus::Authenticated);
    assert_eq!(session.guard(), GuardDecision::Proceed);
    assert_eq!(session.token().as_deref(), Some("abc.def.ghi"));
}

#[test]
fn logout_returns_to_unauthenticated() {
    let session = Session::in_memory();
    session.login("abc.def.ghi").unwrap();
    session.logout().unwrap();
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
}

#[test]
fn invalidate_clears_token() {
    let session = Session::new(Arc::new(MemoryTokenStore::with_token("t.t.t")));
    session.invalidate();
    assert_eq!(session.token(), None);
}

#[test]
fn clones_share_one_view_of_session_state() {
    let session = Session::in_memory();
    let other = session.clone();
    session.login("abc.def.ghi").unwrap();
    assert_eq!(other.status(), AuthStatus::Authenticated);
    other.invalidate();
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
}

#[test]
fn unreadable_store_counts_as_anonymous() {
    let session = Session::new(Arc::new(BrokenStore));
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert!(session.identity().is_anonymous());
    session.invalidate();
    assert!(session.login("x").is_err());
    assert!(session.logout().is_err());
}

#[test]
fn file_backed_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    Session::new(Arc::new(FileTokenStore::new(&path))).login("abc.def.ghi").unwrap();

    let reopened = Session::new(Arc::new(FileTokenStore::new(&path)));
    assert_eq!(reopened.status(), AuthStatus::Authenticated);
}

// =============================================================================
// identity
// =============================================================================

#[test]
fn identity_uses_decoded_username() {
    let session = Session::in_memory();
    session.login(&token_for("alice")).unwrap();
    let identity = session.identity();
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.role.as_deref(), Some("user"));
}

#[test]
fn identity_without_token_is_anonymous() {
    assert!(Session::in_memory().identity().is_anonymous());
}

#[test]
fn identity_with_undecodable_token_falls_back_without_logging_out() {
    let session = Session::in_memory();
    session.login("abc.def.ghi").unwrap();
    assert!(session.identity().is_anonymous());
    assert_eq!(session.status(), AuthStatus::Authenticated);
}

#[test]
fn debug_output_hides_token() {
    let session = Session::in_memory();
    session.login("secret-token").unwrap();
    let rendered = format!("{session:?}");
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("Authenticated"));
}
