use super::*;

fn record(id: i64, code: &str, name: &str) -> Position {
    Position { position_id: id, position_code: code.to_owned(), position_name: name.to_owned() }
}

// =============================================================
// PositionForm
// =============================================================

#[test]
fn form_default_is_create_mode() {
    let form = PositionForm::default();
    assert!(!form.is_editing());
    assert_eq!(form.title(), "Create a new task");
    assert_eq!(form.submit_label(), "Create");
}

#[test]
fn start_edit_populates_fields_from_record() {
    let mut form = PositionForm::default();
    form.start_edit(&record(4, "T-4", "Four"));
    assert_eq!(form.editing_id, Some(4));
    assert_eq!(form.code, "T-4");
    assert_eq!(form.name, "Four");
    assert_eq!(form.title(), "Edit Task");
    assert_eq!(form.submit_label(), "Update");
}

#[test]
fn start_edit_replaces_previous_edit() {
    let mut form = PositionForm::default();
    form.start_edit(&record(1, "A", "One"));
    form.start_edit(&record(2, "B", "Two"));
    assert_eq!(form.editing_id, Some(2));
    assert_eq!(form.code, "B");
}

#[test]
fn clear_leaves_edit_mode_and_empties_inputs() {
    let mut form = PositionForm::default();
    form.start_edit(&record(4, "T-4", "Four"));
    form.clear();
    assert_eq!(form, PositionForm::default());
}

#[test]
fn draft_validates_current_inputs() {
    let form = PositionForm { editing_id: None, code: "TOO-LONG-CODE".to_owned(), name: "n".to_owned() };
    assert_eq!(form.draft().unwrap_err(), ValidationError::CodeTooLong);

    let form = PositionForm { editing_id: None, code: " T ".to_owned(), name: " N ".to_owned() };
    let draft = form.draft().unwrap();
    assert_eq!((draft.code(), draft.name()), ("T", "N"));
}

// =============================================================
// PositionsState
// =============================================================

#[test]
fn state_default_is_empty_and_idle() {
    let state = PositionsState::default();
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[test]
fn find_locates_record_by_id() {
    let state = PositionsState {
        items: vec![record(1, "A", "One"), record(7, "G", "Seven")],
        ..PositionsState::default()
    };
    assert_eq!(state.find(7).map(|p| p.position_code.as_str()), Some("G"));
    assert!(state.find(3).is_none());
}
