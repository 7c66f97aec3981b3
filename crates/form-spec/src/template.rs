use handlebars::{Handlebars, no_escape};
use serde_json::json;

use crate::error::SpecError;
use crate::spec::form::Presentation;

const PROGRESS: &str = "progress";
const INCOMPLETE: &str = "incomplete";
const FAILURE: &str = "failure";
const SUCCESS: &str = "success";

/// Which presentation message to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Incomplete,
    Failure,
    Success,
}

impl Message {
    fn template_name(&self) -> &'static str {
        match self {
            Message::Incomplete => INCOMPLETE,
            Message::Failure => FAILURE,
            Message::Success => SUCCESS,
        }
    }
}

/// Compiled presentation templates for one form.
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new(presentation: &Presentation) -> Result<Self, SpecError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);
        for (name, template) in [
            (PROGRESS, &presentation.progress_template),
            (INCOMPLETE, &presentation.incomplete_message),
            (FAILURE, &presentation.failure_message),
            (SUCCESS, &presentation.success_message),
        ] {
            registry
                .register_template_string(name, template)
                .map_err(Box::new)?;
        }
        let engine = Self { registry };
        engine.render_samples()?;
        Ok(engine)
    }

    /// Render every template once. Strict mode reports unknown variables only
    /// at render time.
    fn render_samples(&self) -> Result<(), SpecError> {
        self.progress_text(1, 1)?;
        for message in [Message::Incomplete, Message::Failure, Message::Success] {
            self.message(message, "form")?;
        }
        Ok(())
    }

    /// Render the progress label, e.g. `Step 2 of 4`.
    pub fn progress_text(&self, current: usize, total: usize) -> Result<String, SpecError> {
        let data = json!({
            "current": current,
            "total": total,
            "percentage": crate::progress::percentage(current, total),
        });
        self.registry
            .render(PROGRESS, &data)
            .map_err(|err| SpecError::Render(Box::new(err)))
    }

    pub fn message(&self, message: Message, form_title: &str) -> Result<String, SpecError> {
        let data = json!({ "form_title": form_title });
        self.registry
            .render(message.template_name(), &data)
            .map_err(|err| SpecError::Render(Box::new(err)))
    }
}
