//! Position-list and edit-form state for the dashboard.
//!
//! DESIGN
//! ======
//! `items` is a display cache only. It is replaced wholesale by every list
//! fetch and never patched locally, so it cannot drift from the server.

#[cfg(test)]
#[path = "positions_test.rs"]
mod positions_test;

use crate::net::types::{Position, PositionDraft, ValidationError};

/// The create/edit form. At most one record is edited at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionForm {
    pub editing_id: Option<i64>,
    pub code: String,
    pub name: String,
}

impl PositionForm {
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Load `record` into the form, replacing any edit in progress.
    pub fn start_edit(&mut self, record: &Position) {
        self.editing_id = Some(record.position_id);
        self.code.clone_from(&record.position_code);
        self.name.clone_from(&record.position_name);
    }

    /// Leave edit mode and empty both inputs.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// # Errors
    ///
    /// Returns [`ValidationError`] when the inputs would be rejected.
    pub fn draft(&self) -> Result<PositionDraft, ValidationError> {
        PositionDraft::new(&self.code, &self.name)
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        if self.is_editing() { "Edit Task" } else { "Create a new task" }
    }

    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() { "Update" } else { "Create" }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PositionsState {
    pub items: Vec<Position>,
    pub loading: bool,
    pub error: Option<String>,
    pub form: PositionForm,
}

impl PositionsState {
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&Position> {
        self.items.iter().find(|p| p.position_id == id)
    }
}
