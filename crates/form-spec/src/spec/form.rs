use std::collections::BTreeSet;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::spec::field::FieldSpec;
use crate::spec::page::PageSpec;
use crate::template::TemplateEngine;

pub const DEFAULT_WEBHOOK_FIELD: &str = "webhookUrl";

/// Message templates shown by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Presentation {
    #[serde(default = "default_progress_template")]
    pub progress_template: String,
    #[serde(default = "default_incomplete_message")]
    pub incomplete_message: String,
    #[serde(default = "default_failure_message")]
    pub failure_message: String,
    #[serde(default = "default_success_message")]
    pub success_message: String,
}

fn default_progress_template() -> String {
    "Step {{current}} of {{total}}".into()
}

fn default_incomplete_message() -> String {
    "Please fill in all required fields before continuing.".into()
}

fn default_failure_message() -> String {
    "There was an error submitting your proposal. Please check your webhook URL and try again."
        .into()
}

fn default_success_message() -> String {
    "Your proposal has been submitted.".into()
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            progress_template: default_progress_template(),
            incomplete_message: default_incomplete_message(),
            failure_message: default_failure_message(),
            success_message: default_success_message(),
        }
    }
}

fn default_webhook_field() -> String {
    DEFAULT_WEBHOOK_FIELD.into()
}

/// Top-level multi-page form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSpec {
    pub id: String,
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub presentation: Presentation,
    /// Field holding the webhook URL. It is read at submission time and kept
    /// out of the submitted record.
    #[serde(default = "default_webhook_field")]
    pub webhook_field: String,
    pub pages: Vec<PageSpec>,
}

impl FormSpec {
    /// Parse and check a form definition.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let spec: FormSpec = serde_json::from_str(json).map_err(SpecError::Parse)?;
        spec.check()?;
        Ok(spec)
    }

    /// Structural checks that serde cannot express.
    pub fn check(&self) -> Result<(), SpecError> {
        if self.pages.is_empty() {
            return Err(SpecError::NoPages(self.id.clone()));
        }

        let mut seen = BTreeSet::new();
        for (index, page) in self.pages.iter().enumerate() {
            if page.fields.is_empty() {
                return Err(SpecError::EmptyPage(index + 1));
            }
            for field in &page.fields {
                if !seen.insert(field.id.as_str()) {
                    return Err(SpecError::DuplicateField(field.id.clone()));
                }
                if let Some(pattern) = field
                    .constraint
                    .as_ref()
                    .and_then(|constraint| constraint.pattern.as_deref())
                {
                    Regex::new(pattern).map_err(|source| SpecError::Pattern {
                        field: field.id.clone(),
                        source,
                    })?;
                }
            }
        }

        match self.field(&self.webhook_field) {
            Some(field) if field.required => {}
            Some(_) => return Err(SpecError::OptionalWebhookField(self.webhook_field.clone())),
            None => return Err(SpecError::UnknownWebhookField(self.webhook_field.clone())),
        }

        TemplateEngine::new(&self.presentation)?;
        Ok(())
    }

    /// JSON Schema of the form definition format itself.
    pub fn json_schema() -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(schemars::schema_for!(FormSpec))
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Look up a page by its 1-based index.
    pub fn page(&self, page: usize) -> Result<&PageSpec, SpecError> {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .ok_or(SpecError::PageOutOfRange {
                page,
                total: self.total_pages(),
            })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.pages.iter().flat_map(|page| page.fields.iter())
    }

    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields().find(|field| field.id == id)
    }

    /// Index of the page that holds `id`.
    pub fn page_of(&self, id: &str) -> Option<usize> {
        self.pages
            .iter()
            .position(|page| page.fields.iter().any(|field| field.id == id))
            .map(|index| index + 1)
    }

    /// Fields that end up in the submitted record, in schema order.
    pub fn record_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields()
            .filter(move |field| field.id != self.webhook_field)
    }
}
