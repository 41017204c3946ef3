//! Client-side session contract: token storage, display-claims decoding and
//! the protected-screen guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`Session`] is the one authoritative view of "am I logged in". It is
//! cloned into every consumer (HTTP client, screens) instead of each of them
//! reading storage on its own, so all consumers agree on session state.
//!
//! LIFECYCLE
//! =========
//! `Unauthenticated -> Authenticated` only through [`Session::login`] after a
//! successful login response. `Authenticated -> Unauthenticated` through
//! [`Session::logout`] or [`Session::invalidate`] when the server answers 401.

pub mod claims;
pub mod guard;
pub mod store;

use std::sync::Arc;

pub use claims::{Claims, DecodeError, DisplayIdentity};
pub use guard::{AuthStatus, GuardDecision, Route};
pub use store::{FileTokenStore, MemoryTokenStore, StoreError, TokenStore};

/// Shared handle to the current client session.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session over a fresh [`MemoryTokenStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Current bearer token, if any. An unreadable store counts as
    /// anonymous.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.store.get() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "token store unreadable; treating session as anonymous");
                None
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        if self.token().is_some() { AuthStatus::Authenticated } else { AuthStatus::Unauthenticated }
    }

    /// Evaluate the protected-screen guard against the current status.
    #[must_use]
    pub fn guard(&self) -> GuardDecision {
        guard::check(self.status())
    }

    /// Record the token from a successful login.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the token cannot be persisted.
    pub fn login(&self, token: &str) -> Result<(), StoreError> {
        self.store.save(token)?;
        tracing::info!("session started");
        Ok(())
    }

    /// Explicit logout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored token cannot be removed.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.clear()?;
        tracing::info!("session ended by logout");
        Ok(())
    }

    /// Drop the session after the server rejected it. Never fails; a store
    /// that cannot be cleared is logged.
    pub fn invalidate(&self) {
        match self.store.clear() {
            Ok(()) => tracing::info!("session invalidated by server"),
            Err(e) => tracing::warn!(error = %e, "failed to clear invalidated session token"),
        }
    }

    /// Who to show as the current user. Falls back to the anonymous
    /// identity when there is no token or it cannot be decoded.
    #[must_use]
    pub fn identity(&self) -> DisplayIdentity {
        let Some(token) = self.token() else {
            return DisplayIdentity::anonymous();
        };
        match claims::decode(&token) {
            Ok(claims) => DisplayIdentity::from(claims),
            Err(e) => {
                tracing::warn!(error = %e, "session token claims undecodable; showing anonymous");
                DisplayIdentity::anonymous()
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("status", &self.status()).finish()
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
