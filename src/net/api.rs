//! REST API client for the positions service.
//!
//! AUTH CONTRACT
//! =============
//! Every authenticated call carries `Authorization: Bearer <token>` (an empty
//! value when anonymous) and `Content-Type: application/json`. A 401 on an
//! authenticated call invalidates the shared [`Session`] and surfaces as
//! [`ApiError::Unauthorized`]; screens answer it by navigating to login.
//! Nothing is retried.
//!
//! Login and register are unauthenticated: a 401 there is a credential
//! failure, reported like any other rejection.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use session::Session;

use super::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use super::types::{Credentials, LoginResponse, Position, PositionDraft, server_message};

const STATUS_UNAUTHORIZED: u16 = 401;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server no longer accepts the session; it has been cleared.
    #[error("session expired; please log in again")]
    Unauthorized,
    /// Non-2xx response carrying a server-provided message.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// Non-2xx response without a usable message.
    #[error("request failed: {status}")]
    Status { status: u16 },
    #[error("network error: {0}")]
    Transport(#[from] TransportError),
    /// A 2xx body that does not match the expected schema.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// The server's own message, when it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Auth {
    Public,
    Bearer,
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Session,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self { transport, session }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `POST /auth/login`, returning the issued access token.
    ///
    /// The token is not stored here; see [`crate::pages::login`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, rejection or a body without
    /// a non-blank `accessToken`.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let body = to_body(credentials)?;
        let response = self.send(Auth::Public, Method::Post, "/auth/login", Some(body)).await?;
        let parsed: LoginResponse = parse_body(&response)?;
        let token = parsed.access_token.trim();
        if token.is_empty() {
            return Err(ApiError::Decode("login response carried an empty accessToken".to_owned()));
        }
        Ok(token.to_owned())
    }

    /// `POST /register`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or rejection.
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let body = to_body(credentials)?;
        self.send(Auth::Public, Method::Post, "/register", Some(body)).await?;
        Ok(())
    }

    /// `GET /positions`, in server order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; [`ApiError::Unauthorized`] after clearing the
    /// session on 401.
    pub async fn list_positions(&self) -> Result<Vec<Position>, ApiError> {
        let response = self.send(Auth::Bearer, Method::Get, "/positions", None).await?;
        parse_body(&response)
    }

    /// `POST /positions`. Returns the created record when the server echoes
    /// one in a recognizable shape.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; [`ApiError::Unauthorized`] after clearing the
    /// session on 401.
    pub async fn create_position(&self, draft: &PositionDraft) -> Result<Option<Position>, ApiError> {
        let body = to_body(draft)?;
        let response = self.send(Auth::Bearer, Method::Post, "/positions", Some(body)).await?;
        Ok(parse_echoed_record(&response))
    }

    /// `PUT /positions/{id}`. Returns the updated record when the server
    /// echoes one in a recognizable shape.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; [`ApiError::Unauthorized`] after clearing the
    /// session on 401.
    pub async fn update_position(&self, id: i64, draft: &PositionDraft) -> Result<Option<Position>, ApiError> {
        let body = to_body(draft)?;
        let path = position_endpoint(id);
        let response = self.send(Auth::Bearer, Method::Put, &path, Some(body)).await?;
        Ok(parse_echoed_record(&response))
    }

    /// `DELETE /positions/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; [`ApiError::Unauthorized`] after clearing the
    /// session on 401.
    pub async fn delete_position(&self, id: i64) -> Result<(), ApiError> {
        let path = position_endpoint(id);
        self.send(Auth::Bearer, Method::Delete, &path, None).await?;
        Ok(())
    }

    fn build_request(&self, auth: Auth, method: Method, path: &str, body: Option<Value>) -> HttpRequest {
        let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
        if auth == Auth::Bearer {
            headers.push(("Authorization".to_owned(), bearer_header_value(self.session.token().as_deref())));
        }
        HttpRequest { method, path: path.to_owned(), headers, body }
    }

    async fn send(
        &self,
        auth: Auth,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(auth, method, path, body);
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(method = method.as_str(), %path, error = %e, "request failed to complete");
                return Err(ApiError::Transport(e));
            }
        };
        tracing::debug!(method = method.as_str(), %path, status = response.status, "api response");

        if auth == Auth::Bearer && response.status == STATUS_UNAUTHORIZED {
            tracing::info!(method = method.as_str(), %path, "server rejected session");
            self.session.invalidate();
            return Err(ApiError::Unauthorized);
        }
        if !response.is_success() {
            return Err(rejection(&response));
        }
        Ok(response)
    }
}

fn position_endpoint(id: i64) -> String {
    format!("/positions/{id}")
}

fn bearer_header_value(token: Option<&str>) -> String {
    token.map(|t| format!("Bearer {t}")).unwrap_or_default()
}

fn rejection(response: &HttpResponse) -> ApiError {
    match server_message(&response.body) {
        Some(message) => ApiError::Rejected { status: response.status, message },
        None => ApiError::Status { status: response.status },
    }
}

fn to_body<T: serde::Serialize>(payload: &T) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Mutations are confirmed by status alone; the list is refetched afterwards,
/// so an unfamiliar echo body is not an error.
fn parse_echoed_record(response: &HttpResponse) -> Option<Position> {
    match serde_json::from_str(&response.body) {
        Ok(position) => Some(position),
        Err(e) => {
            tracing::debug!(error = %e, "mutation response carried no position record");
            None
        }
    }
}
