//! In-memory transports for tests.

use std::sync::{Mutex, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use super::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use super::types::Position;

/// Token shaped like a signed JWT whose payload names `username`.
pub fn token_for(username: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": 1, "username": username, "role": "user" }).to_string());
    format!("{header}.{payload}.sig")
}

pub fn response(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse { status, body: body.to_owned() })
}

// =============================================================================
// ScriptedTransport
// =============================================================================

/// Replays canned responses in order and records every request.
pub struct ScriptedTransport {
    responses: Mutex<Vec<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self { responses: Mutex::new(responses), requests: Mutex::new(Vec::new()) }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        if responses.is_empty() {
            Err(TransportError("no scripted response left".to_owned()))
        } else {
            responses.remove(0)
        }
    }
}

// =============================================================================
// FakeApi
// =============================================================================

struct FakeApiState {
    users: Vec<(String, String)>,
    issued: Vec<String>,
    positions: Vec<Position>,
    next_id: i64,
    requests: Vec<HttpRequest>,
}

/// Behaves like the positions API: accounts, bearer checks and CRUD over an
/// ordered in-memory list.
pub struct FakeApi {
    state: Mutex<FakeApiState>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            state: Mutex::new(FakeApiState {
                users: Vec::new(),
                issued: Vec::new(),
                positions: Vec::new(),
                next_id: 1,
                requests: Vec::new(),
            }),
        }
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, username: &str, password: &str) -> Self {
        self.lock().users.push((username.to_owned(), password.to_owned()));
        self
    }

    /// Issue a token outside the login flow.
    pub fn issue_token(&self, username: &str) -> String {
        let token = token_for(username);
        self.lock().issued.push(token.clone());
        token
    }

    /// Revoke every issued token, as a server-side logout or expiry would.
    pub fn revoke_all(&self) {
        self.lock().issued.clear();
    }

    pub fn seed(&self, code: &str, name: &str) -> i64 {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.positions.push(Position {
            position_id: id,
            position_code: code.to_owned(),
            position_name: name.to_owned(),
        });
        id
    }

    pub fn positions(&self) -> Vec<Position> {
        self.lock().positions.clone()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeApiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl Transport for FakeApi {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        let body = request.body.clone().unwrap_or(serde_json::Value::Null);
        let field = |name: &str| body.get(name).and_then(serde_json::Value::as_str).unwrap_or_default().to_owned();

        match (request.method, request.path.as_str()) {
            (Method::Post, "/auth/login") => {
                let (username, password) = (field("username"), field("password"));
                if state.users.iter().any(|(u, p)| *u == username && *p == password) {
                    let token = token_for(&username);
                    state.issued.push(token.clone());
                    response(201, &json!({ "accessToken": token }).to_string())
                } else {
                    response(401, r#"{"message":"Invalid credentials","statusCode":401}"#)
                }
            }
            (Method::Post, "/register") => {
                let username = field("username");
                if state.users.iter().any(|(u, _)| *u == username) {
                    response(409, r#"{"message":"Username already exists"}"#)
                } else {
                    state.users.push((username, field("password")));
                    response(201, r#"{"ok":true}"#)
                }
            }
            (method, path) => {
                let bearer = request.header("Authorization").unwrap_or_default();
                let authorized = bearer
                    .strip_prefix("Bearer ")
                    .is_some_and(|token| state.issued.iter().any(|t| t == token));
                if !authorized {
                    return response(401, r#"{"message":"Unauthorized","statusCode":401}"#);
                }
                positions_route(&mut state, method, path, &field("position_code"), &field("position_name"))
            }
        }
    }
}

fn positions_route(
    state: &mut FakeApiState,
    method: Method,
    path: &str,
    code: &str,
    name: &str,
) -> Result<HttpResponse, TransportError> {
    if path == "/positions" {
        return match method {
            Method::Get => response(200, &serde_json::to_string(&state.positions).unwrap_or_default()),
            Method::Post => {
                let created = Position {
                    position_id: state.next_id,
                    position_code: code.to_owned(),
                    position_name: name.to_owned(),
                };
                state.next_id += 1;
                state.positions.push(created.clone());
                response(201, &serde_json::to_string(&created).unwrap_or_default())
            }
            _ => response(405, ""),
        };
    }

    let Some(id) = path.strip_prefix("/positions/").and_then(|raw| raw.parse::<i64>().ok()) else {
        return response(404, r#"{"message":"Not Found"}"#);
    };
    let Some(index) = state.positions.iter().position(|p| p.position_id == id) else {
        return response(404, r#"{"message":"Position not found"}"#);
    };
    match method {
        Method::Put => {
            let record = &mut state.positions[index];
            record.position_code = code.to_owned();
            record.position_name = name.to_owned();
            let updated = record.clone();
            response(200, &serde_json::to_string(&updated).unwrap_or_default())
        }
        Method::Delete => {
            state.positions.remove(index);
            response(204, "")
        }
        _ => response(405, ""),
    }
}
