//! Registration screen. A new account does not start a session; the user is
//! sent to login.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use session::Route;

use crate::net::api::ApiClient;
use crate::state::credentials::CredentialsForm;

pub const REGISTER_FAILED: &str = "Register failed";

pub async fn submit(api: &ApiClient, form: &mut CredentialsForm) -> Option<Route> {
    form.error = None;
    let credentials = match form.credentials() {
        Ok(credentials) => credentials,
        Err(message) => {
            form.error = Some(message.to_owned());
            return None;
        }
    };

    let result = api.register(&credentials).await;
    form.clear_password();
    match result {
        Ok(()) => {
            tracing::info!(username = %credentials.username, "registered");
            Some(Route::Login)
        }
        Err(e) => {
            form.error = Some(super::credential_failure(&e, REGISTER_FAILED));
            None
        }
    }
}
