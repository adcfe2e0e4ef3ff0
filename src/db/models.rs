//! Domain models for the forms question store.
//!
//! `Question` maps one row of `forms_question`. `Entry` and `Step` belong to
//! sibling subsystems; they appear here only as hydrated, read-only
//! references.

use serde::{Deserialize, Serialize};

/// Integer primary key used by every forms table.
pub type Id = i64;

/// A question of a form, bound to one entry and one step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Question {
    /// Generated by the store on insert; 0 for an unsaved question.
    pub id: Id,
    pub title: String,
    pub code: String,
    pub description: String,
    pub id_entry: Id,
    pub id_step: Id,
    pub visible_multiview_global: bool,
    pub visible_multiview_form_selected: bool,
    pub column_title: String,
    /// Entry resolved from `id_entry`. Never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Entry>,
    /// Step resolved from `id_step`. Never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<Step>,
}

impl Question {
    /// Create an unsaved question for the given entry and step.
    pub fn new(
        title: impl Into<String>,
        code: impl Into<String>,
        id_entry: Id,
        id_step: Id,
    ) -> Self {
        Self {
            title: title.into(),
            code: code.into(),
            id_entry,
            id_step,
            ..Default::default()
        }
    }

    /// Compare every persisted column, ignoring the hydrated references.
    pub fn same_row(&self, other: &Question) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.code == other.code
            && self.description == other.description
            && self.id_entry == other.id_entry
            && self.id_step == other.id_step
            && self.visible_multiview_global == other.visible_multiview_global
            && self.visible_multiview_form_selected == other.visible_multiview_form_selected
            && self.column_title == other.column_title
    }
}

/// A generic form-field definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    pub id: Id,
    pub title: String,
    pub code: String,
    pub entry_type: String,
}

/// A workflow step of a form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Step {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub id_form: Id,
    pub initial: bool,
    pub final_step: bool,
}

/// One `(id, label)` pair of a reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: Id,
    pub label: String,
}

/// Ordered list of `(id, label)` pairs used to populate UI selection widgets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceList {
    items: Vec<ReferenceItem>,
}

impl ReferenceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, keeping insertion order.
    pub fn add_item(&mut self, id: Id, label: impl Into<String>) {
        self.items.push(ReferenceItem {
            id,
            label: label.into(),
        });
    }

    pub fn items(&self) -> &[ReferenceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ReferenceList {
    type Item = ReferenceItem;
    type IntoIter = std::vec::IntoIter<ReferenceItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
