//! Wire schema of the positions API.
//!
//! DESIGN
//! ======
//! Server records ([`Position`]) always carry an id; outgoing payloads
//! ([`PositionDraft`]) never do and can only be built through validation,
//! so an over-long or empty field never reaches the network.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Maximum characters in a task title (`position_code`).
pub const MAX_CODE_CHARS: usize = 10;
/// Maximum characters in a task description (`position_name`).
pub const MAX_NAME_CHARS: usize = 50;

/// A position/task record as returned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    #[serde(deserialize_with = "deserialize_id")]
    pub position_id: i64,
    pub position_code: String,
    pub position_name: String,
}

/// Validated create/update payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PositionDraft {
    position_code: String,
    position_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Task title is required.")]
    EmptyCode,
    #[error("Task description is required.")]
    EmptyName,
    #[error("Task title must be at most 10 characters.")]
    CodeTooLong,
    #[error("Task description must be at most 50 characters.")]
    NameTooLong,
}

impl PositionDraft {
    /// Trim and validate form input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when a field is empty or longer than its
    /// limit. Lengths count characters, not bytes.
    pub fn new(code: &str, name: &str) -> Result<Self, ValidationError> {
        let code = code.trim();
        let name = name.trim();
        if code.is_empty() {
            return Err(ValidationError::EmptyCode);
        }
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if code.chars().count() > MAX_CODE_CHARS {
            return Err(ValidationError::CodeTooLong);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(ValidationError::NameTooLong);
        }
        Ok(Self { position_code: code.to_owned(), position_name: name.to_owned() })
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.position_code
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.position_name
    }
}

/// Login/register request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful login response body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Pull a human-readable `message` out of an error response body.
///
/// Accepts `{"message": "..."}` and the validation-style
/// `{"message": ["...", "..."]}`, joining list entries with `; `.
#[must_use]
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = match value.get("message")? {
        Value::String(text) => text.trim().to_owned(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        _ => return None,
    };
    if message.is_empty() { None } else { Some(message) }
}

/// Ids arrive as JSON numbers, or as strings from servers that serialize
/// bigint columns as text.
fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid position_id `{text}`"))),
    }
}
