//! Registry of mounted form fields.
//!
//! A form mounts its fields here and keeps the returned handles. The focus
//! tracker only ever talks to a [`FieldRegistry`], so any UI layer can plug
//! in its own field bookkeeping; [`MountedFields`] is the in-process one.

use std::collections::HashMap;
use std::sync::Mutex;

use shiftdesk_types::focus::{FieldHandle, FieldIdentity, FieldKind, FocusedField, SelectionRange};

/// Queries and focus control over the fields currently mounted by a form.
///
/// Lookups by attribute return the first match in mount order.
pub trait FieldRegistry: Send + Sync {
    /// The field that currently has focus, with its selection.
    fn focused(&self) -> Option<FocusedField>;

    fn is_mounted(&self, handle: FieldHandle) -> bool;

    fn find_by_id(&self, id: &str) -> Option<FieldHandle>;

    fn find_by_name(&self, name: &str) -> Option<FieldHandle>;

    /// First field whose class list contains `class`.
    fn find_by_class(&self, class: &str) -> Option<FieldHandle>;

    /// Give `handle` focus and, for text-entry fields, apply `selection`.
    ///
    /// Returns false if the field is no longer mounted.
    fn focus(&self, handle: FieldHandle, selection: Option<SelectionRange>) -> bool;
}

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

/// Attributes of a field about to be mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    kind: FieldKind,
    id: Option<String>,
    name: Option<String>,
    class_name: Option<String>,
}

impl FieldSpec {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            id: None,
            name: None,
            class_name: None,
        }
    }

    pub fn text_input() -> Self {
        Self::new(FieldKind::TextInput)
    }

    pub fn text_area() -> Self {
        Self::new(FieldKind::TextArea)
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Space-separated class list.
    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    fn into_identity(self, handle: FieldHandle) -> FieldIdentity {
        FieldIdentity {
            handle,
            kind: self.kind,
            id: self.id,
            name: self.name,
            class_name: self.class_name,
        }
    }
}

// ---------------------------------------------------------------------------
// MountedFields
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Inner {
    next_handle: u64,
    /// Mounted fields in mount order.
    fields: Vec<FieldIdentity>,
    focused: Option<FieldHandle>,
    selections: HashMap<FieldHandle, SelectionRange>,
}

impl Inner {
    fn allocate(&mut self) -> FieldHandle {
        self.next_handle += 1;
        FieldHandle(self.next_handle)
    }

    fn get(&self, handle: FieldHandle) -> Option<&FieldIdentity> {
        self.fields.iter().find(|f| f.handle == handle)
    }

    fn find(&self, pred: impl Fn(&FieldIdentity) -> bool) -> Option<FieldHandle> {
        self.fields.iter().find(|f| pred(f)).map(|f| f.handle)
    }

    fn forget(&mut self, handle: FieldHandle) {
        self.selections.remove(&handle);
        if self.focused == Some(handle) {
            self.focused = None;
        }
    }
}

/// In-process [`FieldRegistry`].
#[derive(Debug, Default)]
pub struct MountedFields {
    inner: Mutex<Inner>,
}

impl MountedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a field and return its handle.
    pub fn mount(&self, spec: FieldSpec) -> FieldHandle {
        let mut inner = self.inner.lock().expect("field registry lock poisoned");
        let handle = inner.allocate();
        inner.fields.push(spec.into_identity(handle));
        handle
    }

    /// Unmount a field. Its handle becomes invalid and it loses focus.
    pub fn unmount(&self, handle: FieldHandle) -> bool {
        let mut inner = self.inner.lock().expect("field registry lock poisoned");
        let before = inner.fields.len();
        inner.fields.retain(|f| f.handle != handle);
        inner.forget(handle);
        inner.fields.len() != before
    }

    /// Recreate a field in place, as a re-render does: same position and
    /// attributes, new handle, no focus.
    pub fn remount(&self, handle: FieldHandle) -> Option<FieldHandle> {
        let mut inner = self.inner.lock().expect("field registry lock poisoned");
        let pos = inner.fields.iter().position(|f| f.handle == handle)?;
        let fresh = inner.allocate();
        inner.fields[pos].handle = fresh;
        inner.forget(handle);
        Some(fresh)
    }

    /// Focus a field as the user would, leaving its selection alone.
    pub fn focus_field(&self, handle: FieldHandle) -> bool {
        self.focus(handle, None)
    }

    pub fn blur(&self) {
        let mut inner = self.inner.lock().expect("field registry lock poisoned");
        inner.focused = None;
    }

    /// Record the user's selection inside a text-entry field.
    pub fn set_selection(&self, handle: FieldHandle, selection: SelectionRange) -> bool {
        let mut inner = self.inner.lock().expect("field registry lock poisoned");
        match inner.get(handle) {
            Some(field) if field.kind.is_text_entry() => {
                inner.selections.insert(handle, selection);
                true
            }
            _ => false,
        }
    }

    pub fn focused_handle(&self) -> Option<FieldHandle> {
        self.inner.lock().expect("field registry lock poisoned").focused
    }

    pub fn selection(&self, handle: FieldHandle) -> Option<SelectionRange> {
        let inner = self.inner.lock().expect("field registry lock poisoned");
        inner.selections.get(&handle).copied()
    }
}

impl FieldRegistry for MountedFields {
    fn focused(&self) -> Option<FocusedField> {
        let inner = self.inner.lock().expect("field registry lock poisoned");
        let handle = inner.focused?;
        let field = inner.get(handle)?.clone();
        Some(FocusedField {
            selection: inner.selections.get(&handle).copied(),
            field,
        })
    }

    fn is_mounted(&self, handle: FieldHandle) -> bool {
        let inner = self.inner.lock().expect("field registry lock poisoned");
        inner.get(handle).is_some()
    }

    fn find_by_id(&self, id: &str) -> Option<FieldHandle> {
        let inner = self.inner.lock().expect("field registry lock poisoned");
        inner.find(|f| f.id.as_deref() == Some(id))
    }

    fn find_by_name(&self, name: &str) -> Option<FieldHandle> {
        let inner = self.inner.lock().expect("field registry lock poisoned");
        inner.find(|f| f.name.as_deref() == Some(name))
    }

    fn find_by_class(&self, class: &str) -> Option<FieldHandle> {
        let inner = self.inner.lock().expect("field registry lock poisoned");
        inner.find(|f| {
            f.class_name
                .as_deref()
                .is_some_and(|list| list.split_whitespace().any(|c| c == class))
        })
    }

    fn focus(&self, handle: FieldHandle, selection: Option<SelectionRange>) -> bool {
        let mut inner = self.inner.lock().expect("field registry lock poisoned");
        let Some(field) = inner.get(handle) else {
            return false;
        };
        let text_entry = field.kind.is_text_entry();

        inner.focused = Some(handle);
        if let (true, Some(selection)) = (text_entry, selection) {
            inner.selections.insert(handle, selection);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_and_lookup() {
        let fields = MountedFields::new();
        let a = fields.mount(FieldSpec::text_input().id("cashier").class("input wide"));
        let b = fields.mount(FieldSpec::text_input().name("factCash").class("input"));

        assert_ne!(a, b);
        assert_eq!(fields.find_by_id("cashier"), Some(a));
        assert_eq!(fields.find_by_name("factCash"), Some(b));
        // First in mount order wins.
        assert_eq!(fields.find_by_class("input"), Some(a));
        assert_eq!(fields.find_by_class("wide"), Some(a));
        assert_eq!(fields.find_by_class("in"), None);
    }

    #[test]
    fn test_unmount_drops_focus() {
        let fields = MountedFields::new();
        let a = fields.mount(FieldSpec::text_area().id("comments"));
        assert!(fields.focus_field(a));

        assert!(fields.unmount(a));
        assert!(!fields.is_mounted(a));
        assert!(fields.focused().is_none());
        assert!(!fields.unmount(a));
    }

    #[test]
    fn test_remount_keeps_position_and_attributes() {
        let fields = MountedFields::new();
        let a = fields.mount(FieldSpec::text_input().class("qty"));
        let b = fields.mount(FieldSpec::text_input().class("qty"));
        fields.focus_field(a);

        let a2 = fields.remount(a).unwrap();
        assert_ne!(a, a2);
        assert!(!fields.is_mounted(a));
        assert_eq!(fields.find_by_class("qty"), Some(a2));
        assert!(fields.is_mounted(b));
        assert!(fields.focused_handle().is_none());
    }

    #[test]
    fn test_selection_only_on_text_entry() {
        let fields = MountedFields::new();
        let text = fields.mount(FieldSpec::text_input());
        let select = fields.mount(FieldSpec::new(FieldKind::Select));

        assert!(fields.set_selection(text, SelectionRange { start: 1, end: 3 }));
        assert!(!fields.set_selection(select, SelectionRange::cursor(0)));

        assert!(fields.focus(select, Some(SelectionRange::cursor(2))));
        assert!(fields.selection(select).is_none());

        let focused = fields.focused().unwrap();
        assert_eq!(focused.field.handle, select);
    }
}
