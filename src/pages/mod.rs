//! Screen controllers.
//!
//! ARCHITECTURE
//! ============
//! Each screen owns its state, calls [`crate::net::api::ApiClient`], and
//! answers with an optional [`session::Route`] to navigate to. Rendering is
//! plain text so the CLI can print it.

pub mod dashboard;
pub mod login;
pub mod register;

use crate::net::api::ApiError;

/// Message for a failed credential submission: the server's own words when
/// it sent any, otherwise `fallback`.
fn credential_failure(error: &ApiError, fallback: &str) -> String {
    if let ApiError::Transport(e) = error {
        tracing::warn!(error = %e, "credential submission did not reach the server");
    }
    error.server_message().unwrap_or(fallback).to_owned()
}
