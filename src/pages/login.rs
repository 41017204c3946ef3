//! Login screen: exchanges credentials for a session token.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use session::Route;

use crate::net::api::ApiClient;
use crate::state::credentials::CredentialsForm;

pub const LOGIN_FAILED: &str = "Login failed";

/// Submit the login form. On success the token is stored in the session and
/// the screen navigates to the dashboard; otherwise `form.error` explains
/// why.
pub async fn submit(api: &ApiClient, form: &mut CredentialsForm) -> Option<Route> {
    form.error = None;
    let credentials = match form.credentials() {
        Ok(credentials) => credentials,
        Err(message) => {
            form.error = Some(message.to_owned());
            return None;
        }
    };

    let result = api.login(&credentials).await;
    form.clear_password();
    let token = match result {
        Ok(token) => token,
        Err(e) => {
            form.error = Some(super::credential_failure(&e, LOGIN_FAILED));
            return None;
        }
    };

    if let Err(e) = api.session().login(&token) {
        form.error = Some(format!("Could not save session: {e}"));
        return None;
    }
    tracing::info!(username = %credentials.username, "logged in");
    Some(Route::Dashboard)
}
