//! Field identity and focus snapshot types.
//!
//! Forms mount their input fields into a registry and receive a
//! [`FieldHandle`] back. A handle is only valid while the field stays
//! mounted; a re-render that recreates the field issues a new handle for the
//! same `id` / `name` / class, which is what focus restoration falls back on.

use serde::{Deserialize, Serialize};

/// Registry-issued handle of a mounted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldHandle(pub u64);

/// Kind of input control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text input.
    TextInput,
    /// Multi-line text area.
    TextArea,
    Select,
    Checkbox,
    FileInput,
    Button,
}

impl FieldKind {
    /// Only text-entry controls have a cursor worth preserving.
    pub fn is_text_entry(self) -> bool {
        matches!(self, FieldKind::TextInput | FieldKind::TextArea)
    }
}

/// Text selection bounds; `start == end` is a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn cursor(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

/// Identity attributes of a mounted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIdentity {
    pub handle: FieldHandle,
    pub kind: FieldKind,
    pub id: Option<String>,
    pub name: Option<String>,
    /// Space-separated class list.
    pub class_name: Option<String>,
}

impl FieldIdentity {
    /// First class of the class list, if any.
    pub fn first_class(&self) -> Option<&str> {
        self.class_name
            .as_deref()
            .and_then(|c| c.split_whitespace().next())
    }
}

/// The currently focused field and its selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusedField {
    pub field: FieldIdentity,
    pub selection: Option<SelectionRange>,
}

/// Which field had focus when a save cycle began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSnapshot {
    pub handle: FieldHandle,
    pub id: Option<String>,
    pub name: Option<String>,
    pub class: Option<String>,
    pub selection: Option<SelectionRange>,
}
