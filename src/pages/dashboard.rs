//! Task dashboard: the guarded CRUD list of positions.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing screen. [`Dashboard::open`] runs the
//! session guard before any state exists, so an anonymous user gets a
//! redirect and never a rendered list. After every successful mutation the
//! full list is fetched again rather than patched locally.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::fmt;

use session::{DisplayIdentity, GuardDecision, Route, StoreError};

use crate::net::api::{ApiClient, ApiError};
use crate::state::positions::PositionsState;

pub const EMPTY_LIST: &str = "No work found.";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this work?";

pub struct Dashboard {
    api: ApiClient,
    state: PositionsState,
}

impl Dashboard {
    /// Enter the dashboard: guard, then initial load.
    ///
    /// # Errors
    ///
    /// Returns the route to navigate to when the session is missing or the
    /// server rejects it during the initial load.
    pub async fn open(api: ApiClient) -> Result<Self, Route> {
        if let GuardDecision::Redirect(route) = api.session().guard() {
            return Err(route);
        }
        let mut page = Self { api, state: PositionsState::default() };
        if let Some(route) = page.refresh().await {
            return Err(route);
        }
        Ok(page)
    }

    #[must_use]
    pub fn state(&self) -> &PositionsState {
        &self.state
    }

    #[must_use]
    pub fn identity(&self) -> DisplayIdentity {
        self.api.session().identity()
    }

    /// Replace the cached list with the server's.
    pub async fn refresh(&mut self) -> Option<Route> {
        self.state.loading = true;
        self.state.error = None;
        let result = self.api.list_positions().await;
        self.state.loading = false;
        match result {
            Ok(items) => {
                self.state.items = items;
                None
            }
            Err(e) => self.fail(e),
        }
    }

    /// Load record `id` into the form. Returns `false` if it is not listed.
    pub fn start_edit(&mut self, id: i64) -> bool {
        let Some(record) = self.state.find(id).cloned() else {
            return false;
        };
        self.state.form.start_edit(&record);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.state.form.clear();
    }

    pub fn set_code(&mut self, code: &str) {
        code.clone_into(&mut self.state.form.code);
    }

    pub fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.state.form.name);
    }

    /// Create, or update the record being edited. Invalid input is reported
    /// without contacting the server.
    pub async fn submit(&mut self) -> Option<Route> {
        self.state.error = None;
        let draft = match self.state.form.draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.state.error = Some(e.to_string());
                return None;
            }
        };

        let result = match self.state.form.editing_id {
            Some(id) => self.api.update_position(id, &draft).await,
            None => self.api.create_position(&draft).await,
        };
        match result {
            Ok(_) => {
                self.state.form.clear();
                self.refresh().await
            }
            Err(e) => self.fail(e),
        }
    }

    /// Delete record `id` once `confirm` agrees.
    pub async fn delete(&mut self, id: i64, confirm: impl FnOnce(i64) -> bool) -> Option<Route> {
        if !confirm(id) {
            return None;
        }
        self.state.error = None;
        match self.api.delete_position(id).await {
            Ok(()) => {
                self.state.form.clear();
                self.refresh().await
            }
            Err(e) => self.fail(e),
        }
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored token cannot be removed.
    pub fn logout(&mut self) -> Result<Route, StoreError> {
        self.api.session().logout()?;
        Ok(Route::Login)
    }

    fn fail(&mut self, error: ApiError) -> Option<Route> {
        if matches!(error, ApiError::Unauthorized) {
            return Some(Route::Login);
        }
        self.state.error = Some(error.to_string());
        None
    }

    /// The whole screen as text.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = &self.state;
        let form = &state.form;

        writeln!(f, "TO-DO Dashboard ({})", self.identity().username)?;
        writeln!(f)?;
        writeln!(f, "{}", form.title())?;
        writeln!(f, "  Title:       {}", form.code)?;
        writeln!(f, "  Description: {}", form.name)?;
        writeln!(f, "  [{}]", form.submit_label())?;
        if let Some(error) = &state.error {
            writeln!(f, "  Error: {error}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", if state.loading { "Tasks (loading...)" } else { "Tasks" })?;
        write!(f, "{}", TaskTable(state))
    }
}

/// The task table alone.
#[must_use]
pub fn render_table(state: &PositionsState) -> String {
    TaskTable(state).to_string()
}

struct TaskTable<'a>(&'a PositionsState);

impl fmt::Display for TaskTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        if state.items.is_empty() {
            if !state.loading {
                writeln!(f, "{EMPTY_LIST}")?;
            }
            return Ok(());
        }
        writeln!(f, "{:<8} {:<10} {}", "ID", "Title", "Description")?;
        for p in &state.items {
            let marker = if state.form.editing_id == Some(p.position_id) { "*" } else { "" };
            let id = format!("{}{marker}", p.position_id);
            writeln!(f, "{id:<8} {:<10} {}", p.position_code, p.position_name)?;
        }
        Ok(())
    }
}

// =============================================================================
// INTERACTIVE COMMANDS
// =============================================================================

pub const HELP: &str = "\
commands:
  refresh            reload the task list
  code <text>        set the task title
  name <text>        set the task description
  save               create, or update the task being edited
  edit <id>          edit a task
  cancel             stop editing and clear the form
  delete <id>        delete a task
  logout             end the session
  help               show this help
  quit               leave the dashboard";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DashboardCommand {
    Refresh,
    Code(String),
    Name(String),
    Save,
    Edit(i64),
    Cancel,
    Delete(i64),
    Logout,
    Help,
    Quit,
}

/// Parse one line of interactive input.
///
/// # Errors
///
/// Returns a message for unknown commands or malformed arguments.
pub fn parse_command(line: &str) -> Result<DashboardCommand, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let id = || rest.parse::<i64>().map_err(|_| format!("`{word}` expects a numeric id"));

    match word {
        "refresh" => Ok(DashboardCommand::Refresh),
        "code" => Ok(DashboardCommand::Code(rest.to_owned())),
        "name" => Ok(DashboardCommand::Name(rest.to_owned())),
        "save" => Ok(DashboardCommand::Save),
        "edit" => id().map(DashboardCommand::Edit),
        "cancel" => Ok(DashboardCommand::Cancel),
        "delete" => id().map(DashboardCommand::Delete),
        "logout" => Ok(DashboardCommand::Logout),
        "help" | "?" => Ok(DashboardCommand::Help),
        "quit" | "exit" => Ok(DashboardCommand::Quit),
        "" => Err("type `help` for commands".to_owned()),
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}
