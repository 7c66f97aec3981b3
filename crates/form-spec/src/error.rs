use thiserror::Error;

/// Errors raised while loading or applying a form definition.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("failed to parse form spec: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("form '{0}' defines no pages")]
    NoPages(String),
    #[error("page {0} defines no fields")]
    EmptyPage(usize),
    #[error("field '{0}' is defined more than once")]
    DuplicateField(String),
    #[error("webhook field '{0}' is not defined on any page")]
    UnknownWebhookField(String),
    #[error("webhook field '{0}' must be required")]
    OptionalWebhookField(String),
    #[error("field '{field}' has an invalid pattern: {source}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid presentation template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),
    #[error("failed to render template: {0}")]
    Render(#[from] Box<handlebars::RenderError>),
    #[error("page {page} is out of range (1..={total})")]
    PageOutOfRange { page: usize, total: usize },
    #[error("field '{0}' is missing from the form")]
    MissingField(String),
    #[error("unknown built-in form '{0}'")]
    UnknownForm(String),
}
