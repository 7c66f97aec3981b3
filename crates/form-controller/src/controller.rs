use std::collections::BTreeSet;

use form_spec::{
    FieldRecord, FormSpec, Message, PageValidation, Progress, SpecError, TemplateEngine, collect,
    navigation, validate_page,
};
use tracing::{debug, info, warn};

use crate::error::ControllerError;
use crate::state::FormState;
use crate::view::{Focus, FormView, Key, SubmitState};
use crate::webhook::WebhookClient;

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Moved to the given page.
    Moved(usize),
    /// The current page failed validation.
    Blocked,
    /// Already on the first or last page.
    AtBoundary,
}

/// Result of a submission that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Not on the last page, or the page failed validation; nothing was sent.
    Blocked,
    /// The webhook accepted the record with this status.
    Delivered { status: u16 },
}

/// Synchronous UI events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    Next,
    Previous,
    Key { key: Key, focus: Focus },
    Input { field: String },
    CloseModal,
}

/// Drives page navigation, validation and submission for one form.
pub struct FormController {
    spec: FormSpec,
    templates: TemplateEngine,
    state: FormState,
    flagged: BTreeSet<String>,
    submit_state: SubmitState,
    modal_open: bool,
}

impl FormController {
    pub fn new(spec: FormSpec) -> Result<Self, ControllerError> {
        spec.check()?;
        let templates = TemplateEngine::new(&spec.presentation)?;
        let state = FormState::new(spec.total_pages())?;
        Ok(Self {
            spec,
            templates,
            state,
            flagged: BTreeSet::new(),
            submit_state: SubmitState::Ready,
            modal_open: false,
        })
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    pub fn templates(&self) -> &TemplateEngine {
        &self.templates
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages()
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit_state
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn flagged_fields(&self) -> impl Iterator<Item = &str> {
        self.flagged.iter().map(String::as_str)
    }

    /// Render page 1 with its progress and navigation state.
    pub fn initialize<V: FormView>(&mut self, view: &mut V) -> Result<(), ControllerError> {
        self.state.reset();
        self.set_submit_state(view, SubmitState::Ready);
        self.render_page(view)
    }

    /// Jump to `page` and render it.
    pub fn show_page<V: FormView>(
        &mut self,
        view: &mut V,
        page: usize,
    ) -> Result<(), ControllerError> {
        self.state.go_to(page)?;
        self.render_page(view)
    }

    fn render_page<V: FormView>(&self, view: &mut V) -> Result<(), ControllerError> {
        let page = self.state.current_page();
        let total = self.state.total_pages();
        let progress = Progress::new(&self.templates, page, total)?;
        view.show_page(page);
        view.set_progress(&progress);
        view.set_navigation(navigation(page, total));
        view.scroll_to_top();
        debug!(form = %self.spec.id, page, total, "showing page");
        Ok(())
    }

    /// Validate the current page and move forward when it passes.
    pub fn next_page<V: FormView>(&mut self, view: &mut V) -> Result<Navigation, ControllerError> {
        if !self.validate_current_page(view)?.is_valid() {
            return Ok(Navigation::Blocked);
        }
        if !self.state.advance() {
            return Ok(Navigation::AtBoundary);
        }
        self.render_page(view)?;
        Ok(Navigation::Moved(self.state.current_page()))
    }

    pub fn previous_page<V: FormView>(
        &mut self,
        view: &mut V,
    ) -> Result<Navigation, ControllerError> {
        if !self.state.retreat() {
            return Ok(Navigation::AtBoundary);
        }
        self.render_page(view)?;
        Ok(Navigation::Moved(self.state.current_page()))
    }

    /// Check the fields of the visible page only.
    ///
    /// Required fields left blank are flagged until their next input event.
    pub fn validate_current_page<V: FormView>(
        &mut self,
        view: &mut V,
    ) -> Result<PageValidation, ControllerError> {
        let result = validate_page(&self.spec, self.state.current_page(), &*view)?;
        if result.is_valid() {
            return Ok(result);
        }

        for field in result.failing_fields() {
            view.flag_field(&field);
            self.flagged.insert(field);
        }

        debug!(
            page = result.page,
            missing = ?result.missing_required,
            "page failed validation"
        );
        view.alert(&self.templates.message(Message::Incomplete, &self.spec.title)?);
        Ok(result)
    }

    /// Clear a validation flag on the field's first input after it was set.
    pub fn on_field_input<V: FormView>(&mut self, view: &mut V, field: &str) -> bool {
        if self.flagged.remove(field) {
            view.clear_field_flag(field);
            true
        } else {
            false
        }
    }

    /// Snapshot every record field from the view.
    pub fn collect_form_data<V: FormView>(&self, view: &V) -> Result<FieldRecord, ControllerError> {
        collect(&self.spec, view).map_err(ControllerError::from)
    }

    /// Validate the last page, then post the record to the webhook URL
    /// held by the form.
    ///
    /// On delivery the success modal opens and the submit control stays in
    /// its loading state until the modal is closed. On any failure the user
    /// is alerted, the submit control is restored, and the error is returned.
    pub async fn handle_submit<V: FormView>(
        &mut self,
        view: &mut V,
        webhook: &WebhookClient,
    ) -> Result<SubmitOutcome, ControllerError> {
        if !self.state.is_last() {
            debug!(
                form = %self.spec.id,
                page = self.state.current_page(),
                "submit ignored before the last page"
            );
            return Ok(SubmitOutcome::Blocked);
        }
        if !self.validate_current_page(view)?.is_valid() {
            return Ok(SubmitOutcome::Blocked);
        }

        self.set_submit_state(view, SubmitState::Loading);
        match self.deliver(&*view, webhook).await {
            Ok(status) => {
                info!(form = %self.spec.id, status, "proposal delivered");
                self.show_success_modal(view)?;
                Ok(SubmitOutcome::Delivered { status })
            }
            Err(err) => {
                warn!(form = %self.spec.id, error = %err, "proposal submission failed");
                self.set_submit_state(view, SubmitState::Ready);
                view.alert(&self.templates.message(Message::Failure, &self.spec.title)?);
                Err(err)
            }
        }
    }

    async fn deliver<V: FormView>(
        &self,
        view: &V,
        webhook: &WebhookClient,
    ) -> Result<u16, ControllerError> {
        let record = self.collect_form_data(view)?;
        let url = view
            .field_value(&self.spec.webhook_field)
            .ok_or_else(|| SpecError::MissingField(self.spec.webhook_field.clone()))?;
        Ok(webhook.post_record(url.trim(), &record).await?)
    }

    pub fn show_success_modal<V: FormView>(&mut self, view: &mut V) -> Result<(), ControllerError> {
        view.show_modal(&self.templates.message(Message::Success, &self.spec.title)?);
        self.modal_open = true;
        Ok(())
    }

    /// Close the modal and start over with a blank form on page 1.
    pub fn close_success_modal<V: FormView>(
        &mut self,
        view: &mut V,
    ) -> Result<(), ControllerError> {
        view.hide_modal();
        self.modal_open = false;
        view.reset_fields();
        for field in std::mem::take(&mut self.flagged) {
            view.clear_field_flag(&field);
        }
        self.state.reset();
        self.render_page(view)?;
        self.set_submit_state(view, SubmitState::Ready);
        Ok(())
    }

    /// Arrow-key navigation, ignored while a text widget has focus.
    pub fn handle_key<V: FormView>(
        &mut self,
        view: &mut V,
        key: Key,
        focus: Focus,
    ) -> Result<Option<Navigation>, ControllerError> {
        if focus.captures_arrows() {
            return Ok(None);
        }
        match key {
            Key::ArrowRight if !self.state.is_last() => self.next_page(view).map(Some),
            Key::ArrowLeft if !self.state.is_first() => self.previous_page(view).map(Some),
            _ => Ok(None),
        }
    }

    pub fn dispatch<V: FormView>(
        &mut self,
        view: &mut V,
        event: ControllerEvent,
    ) -> Result<Option<Navigation>, ControllerError> {
        match event {
            ControllerEvent::Next => self.next_page(view).map(Some),
            ControllerEvent::Previous => self.previous_page(view).map(Some),
            ControllerEvent::Key { key, focus } => self.handle_key(view, key, focus),
            ControllerEvent::Input { field } => {
                self.on_field_input(view, &field);
                Ok(None)
            }
            ControllerEvent::CloseModal => {
                self.close_success_modal(view)?;
                Ok(None)
            }
        }
    }

    fn set_submit_state<V: FormView>(&mut self, view: &mut V, state: SubmitState) {
        self.submit_state = state;
        view.set_submit_state(state);
    }
}
