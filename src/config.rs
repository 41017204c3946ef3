//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "http://localhost:3001";
pub const TOKEN_FILE_NAME: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
    #[error("{var} must be a whole number of seconds, got `{value}`")]
    InvalidSeconds { var: &'static str, value: String },
}

/// Optional transport timeouts. `None` leaves the transport default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub token_file: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `TASKDESK_API_BASE`: default `http://localhost:3001`
    /// - `TASKDESK_TOKEN_FILE`: default `$HOME/.taskdesk/token`
    /// - `TASKDESK_REQUEST_TIMEOUT_SECS`: unset means no timeout
    /// - `TASKDESK_CONNECT_TIMEOUT_SECS`: unset means no timeout
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base = match std::env::var("TASKDESK_API_BASE") {
            Ok(raw) => normalize_api_base("TASKDESK_API_BASE", &raw)?,
            Err(_) => DEFAULT_API_BASE.to_owned(),
        };
        let token_file = std::env::var_os("TASKDESK_TOKEN_FILE")
            .filter(|v| !v.is_empty())
            .map_or_else(default_token_file, PathBuf::from);
        let timeouts = Timeouts {
            request_secs: env_parse_secs("TASKDESK_REQUEST_TIMEOUT_SECS")?,
            connect_secs: env_parse_secs("TASKDESK_CONNECT_TIMEOUT_SECS")?,
        };
        Ok(Self { api_base, token_file, timeouts })
    }

    /// Apply command-line overrides on top of the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the overriding base URL is empty.
    pub fn with_overrides(
        mut self,
        api_base: Option<String>,
        token_file: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = api_base {
            self.api_base = normalize_api_base("--api-base", &raw)?;
        }
        if let Some(path) = token_file {
            self.token_file = path;
        }
        Ok(self)
    }
}

fn normalize_api_base(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(trimmed.to_owned())
}

fn env_parse_secs(var: &'static str) -> Result<Option<u64>, ConfigError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidSeconds { var, value: raw.to_owned() })
}

fn default_token_file() -> PathBuf {
    match std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        Some(home) => PathBuf::from(home).join(".taskdesk").join(TOKEN_FILE_NAME),
        None => PathBuf::from(".taskdesk-token"),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
