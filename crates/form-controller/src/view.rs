use std::collections::{BTreeMap, BTreeSet};

use form_spec::{FieldKind, FieldSource, FormSpec, NavigationState, Progress};

/// State of the submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    /// Enabled, showing its label.
    #[default]
    Ready,
    /// Disabled, showing the loader.
    Loading,
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Where keyboard focus sits when a key is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    TextInput,
    TextArea,
    Other,
}

impl Focus {
    pub fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Textarea => Focus::TextArea,
            FieldKind::Text | FieldKind::Url | FieldKind::Number | FieldKind::Email => {
                Focus::TextInput
            }
        }
    }

    /// Arrow keys belong to the text widget while it has focus.
    pub fn captures_arrows(&self) -> bool {
        matches!(self, Focus::TextInput | Focus::TextArea)
    }
}

/// The UI surface a [`crate::FormController`] drives.
///
/// Field values are read through [`FieldSource`]; `None` means the form has
/// no such field.
pub trait FormView: FieldSource {
    /// Hide every page and show `page`.
    fn show_page(&mut self, page: usize);
    fn set_progress(&mut self, progress: &Progress);
    fn set_navigation(&mut self, navigation: NavigationState);
    fn scroll_to_top(&mut self) {}
    /// Mark a field as failing validation.
    fn flag_field(&mut self, id: &str);
    fn clear_field_flag(&mut self, id: &str);
    /// Blocking message to the user.
    fn alert(&mut self, message: &str);
    fn set_submit_state(&mut self, state: SubmitState);
    fn show_modal(&mut self, message: &str);
    fn hide_modal(&mut self);
    /// Restore every field to its initial value.
    fn reset_fields(&mut self);
}

/// In-memory view used for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    initial: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
    pub active_page: Option<usize>,
    pub progress: Option<Progress>,
    pub navigation: Option<NavigationState>,
    pub flagged: BTreeSet<String>,
    pub alerts: Vec<String>,
    pub submit_state: SubmitState,
    pub modal: Option<String>,
    pub scrolls: usize,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view holding every field of `spec`, each starting empty.
    pub fn for_form(spec: &FormSpec) -> Self {
        let initial = spec
            .fields()
            .map(|field| (field.id.clone(), String::new()))
            .collect::<BTreeMap<_, _>>();
        Self {
            values: initial.clone(),
            initial,
            ..Self::default()
        }
    }

    pub fn set_value(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn remove_field(&mut self, id: &str) {
        self.initial.remove(id);
        self.values.remove(id);
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    pub fn progress_text(&self) -> Option<&str> {
        self.progress.as_ref().map(|progress| progress.text.as_str())
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }
}

impl FieldSource for MemoryView {
    fn field_value(&self, id: &str) -> Option<String> {
        self.values.get(id).cloned()
    }
}

impl FormView for MemoryView {
    fn show_page(&mut self, page: usize) {
        self.active_page = Some(page);
    }

    fn set_progress(&mut self, progress: &Progress) {
        self.progress = Some(progress.clone());
    }

    fn set_navigation(&mut self, navigation: NavigationState) {
        self.navigation = Some(navigation);
    }

    fn scroll_to_top(&mut self) {
        self.scrolls += 1;
    }

    fn flag_field(&mut self, id: &str) {
        self.flagged.insert(id.to_string());
    }

    fn clear_field_flag(&mut self, id: &str) {
        self.flagged.remove(id);
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn set_submit_state(&mut self, state: SubmitState) {
        self.submit_state = state;
    }

    fn show_modal(&mut self, message: &str) {
        self.modal = Some(message.to_string());
    }

    fn hide_modal(&mut self) {
        self.modal = None;
    }

    fn reset_fields(&mut self) {
        self.values = self.initial.clone();
    }
}
