#![allow(missing_docs)]

pub mod builtin;
pub mod error;
pub mod examples;
pub mod progress;
pub mod record;
pub mod record_schema;
pub mod render;
pub mod spec;
pub mod template;
pub mod validate;

pub use error::SpecError;
pub use examples::generate as example_record;
pub use progress::{NavigationState, Progress, navigation, percentage};
pub use record::{FieldRecord, FieldSource, collect};
pub use record_schema::generate as record_schema;
pub use render::{PagePayload, RenderField, build_page_payload, render_json_ui, render_text};
pub use spec::{Constraint, FieldKind, FieldSpec, FormSpec, PageSpec, Presentation};
pub use template::{Message, TemplateEngine};
pub use validate::{
    PageValidation, ValidationError, ValidationResult, check_page_values, validate, validate_page,
};
