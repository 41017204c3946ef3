//! Screen-entry gate for protected views.
//!
//! The guard is evaluated before a protected screen produces any output, so
//! an anonymous user never sees protected content, not even briefly.

/// Whether a token is present. Presence is all the client can know; the
/// server decides whether the token is actually valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    Unauthenticated,
    Authenticated,
}

/// Navigation targets of the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Login entry point.
    Login,
    Register,
    Dashboard,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
        }
    }
}

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the protected screen.
    Proceed,
    /// Render nothing and navigate to the given route.
    Redirect(Route),
}

/// Gate a protected screen on the current auth status.
#[must_use]
pub fn check(status: AuthStatus) -> GuardDecision {
    match status {
        AuthStatus::Authenticated => GuardDecision::Proceed,
        AuthStatus::Unauthenticated => GuardDecision::Redirect(Route::Login),
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
