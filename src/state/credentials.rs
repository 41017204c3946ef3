//! Login/register form state.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use crate::net::types::Credentials;

pub const MISSING_CREDENTIALS: &str = "Enter both username and password.";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
}

impl CredentialsForm {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into(), error: None }
    }

    /// Credentials ready to submit. The username is trimmed; the password is
    /// sent exactly as typed.
    ///
    /// # Errors
    ///
    /// Returns [`MISSING_CREDENTIALS`] when either field is blank.
    pub fn credentials(&self) -> Result<Credentials, &'static str> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(MISSING_CREDENTIALS);
        }
        Ok(Credentials { username: username.to_owned(), password: self.password.clone() })
    }

    /// Forget the password after a submission attempt completes.
    pub fn clear_password(&mut self) {
        self.password.clear();
    }
}
