use std::collections::{BTreeMap, BTreeSet};

use form_controller::{Focus, FormView, Key, SubmitState};
use form_spec::{FieldSource, FieldSpec, FormSpec, NavigationState, Progress};

const BAR_WIDTH: usize = 20;

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: page headers and prompts only.
    Clean,
    /// Verbose output: page summaries and submission state.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Terminal rendition of the form: prints page changes and keeps the typed
/// values in memory.
pub struct TerminalView {
    verbosity: Verbosity,
    page_titles: Vec<String>,
    initial: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
    flagged: BTreeSet<String>,
    navigation: NavigationState,
}

impl TerminalView {
    pub fn new(spec: &FormSpec, verbosity: Verbosity) -> Self {
        let initial = spec
            .fields()
            .map(|field| (field.id.clone(), String::new()))
            .collect::<BTreeMap<_, _>>();
        Self {
            verbosity,
            page_titles: spec.pages.iter().map(|page| page.title.clone()).collect(),
            values: initial.clone(),
            initial,
            flagged: BTreeSet::new(),
            navigation: form_spec::navigation(1, spec.total_pages()),
        }
    }

    pub fn set_value(&mut self, id: &str, value: String) {
        self.values.insert(id.to_string(), value);
    }

    /// Set a value that `reset_fields` restores rather than clears.
    pub fn set_initial(&mut self, id: &str, value: String) {
        self.initial.insert(id.to_string(), value.clone());
        self.values.insert(id.to_string(), value);
    }

    pub fn is_flagged(&self, id: &str) -> bool {
        self.flagged.contains(id)
    }

    pub fn navigation(&self) -> NavigationState {
        self.navigation
    }
}

impl FieldSource for TerminalView {
    fn field_value(&self, id: &str) -> Option<String> {
        self.values.get(id).cloned()
    }
}

impl FormView for TerminalView {
    fn show_page(&mut self, page: usize) {
        let title = self
            .page_titles
            .get(page.saturating_sub(1))
            .map(String::as_str)
            .unwrap_or("");
        println!();
        println!("== {} ==", title);
    }

    fn set_progress(&mut self, progress: &Progress) {
        println!("{} {}", progress.text, progress_bar(progress.percentage));
    }

    fn set_navigation(&mut self, navigation: NavigationState) {
        self.navigation = navigation;
    }

    fn flag_field(&mut self, id: &str) {
        self.flagged.insert(id.to_string());
    }

    fn clear_field_flag(&mut self, id: &str) {
        self.flagged.remove(id);
    }

    fn alert(&mut self, message: &str) {
        eprintln!("! {}", message);
    }

    fn set_submit_state(&mut self, state: SubmitState) {
        if state == SubmitState::Loading {
            println!("Submitting...");
        } else if self.verbosity.is_verbose() {
            println!("Submit ready.");
        }
    }

    fn show_modal(&mut self, message: &str) {
        println!();
        println!("{}", message);
    }

    fn hide_modal(&mut self) {}

    fn reset_fields(&mut self) {
        self.values = self.initial.clone();
    }
}

fn progress_bar(percentage: f64) -> String {
    let filled = ((percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One line of input typed at the action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    Key(Key),
    Submit,
    Edit,
    Quit,
}

impl Action {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "n" | "next" => Some(Action::Next),
            "p" | "prev" | "previous" | "back" => Some(Action::Previous),
            ">" => Some(Action::Key(Key::ArrowRight)),
            "<" => Some(Action::Key(Key::ArrowLeft)),
            "s" | "submit" => Some(Action::Submit),
            "e" | "edit" | "" => Some(Action::Edit),
            "q" | "quit" | "exit" => Some(Action::Quit),
            _ => None,
        }
    }

    /// Submit is only offered once the submit control is visible.
    pub fn is_offered(&self, navigation: NavigationState) -> bool {
        match self {
            Action::Submit => navigation.submit_visible,
            _ => true,
        }
    }

    /// The action prompt never has a text field focused.
    pub fn focus() -> Focus {
        Focus::Other
    }
}

/// Available commands for the current navigation state.
pub fn action_hint(navigation: NavigationState) -> String {
    let mut commands = Vec::new();
    if !navigation.next_hidden {
        commands.push("[n]ext");
    }
    if !navigation.previous_disabled {
        commands.push("[p]revious");
    }
    if navigation.submit_visible {
        commands.push("[s]ubmit");
    }
    commands.push("[e]dit");
    commands.push("[q]uit");
    commands.join(" ")
}

/// Prompt text for one field.
pub fn field_prompt(field: &FieldSpec, current: &str, flagged: bool) -> String {
    let mut line = String::new();
    if flagged {
        line.push_str("! ");
    }
    line.push_str(&field.label);
    if field.required {
        line.push_str(" *");
    }
    if let Some(placeholder) = &field.placeholder {
        line.push_str(&format!(" ({})", placeholder));
    }
    if !current.is_empty() {
        line.push_str(&format!(" [{}]", current.replace('\n', "\\n")));
    }
    line
}

/// Interpret typed field input. `None` keeps the current value; `-` clears it.
pub fn parse_field_input(field: &FieldSpec, raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches(['\r', '\n']);
    match trimmed {
        "" => None,
        "-" => Some(String::new()),
        value if field.kind == form_spec::FieldKind::Textarea => Some(value.replace("\\n", "\n")),
        value => Some(value.to_string()),
    }
}
