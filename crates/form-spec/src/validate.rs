use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SpecError;
use crate::record::FieldSource;
use crate::spec::field::{Constraint, FieldSpec};
use crate::spec::form::FormSpec;

/// A value that is present but unacceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub page: usize,
    pub message: String,
    pub code: String,
}

/// Outcome of checking a single page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PageValidation {
    pub page: usize,
    pub missing_required: Vec<String>,
}

impl PageValidation {
    pub fn is_valid(&self) -> bool {
        self.missing_required.is_empty()
    }

    /// Every field that should be flagged, in page order.
    pub fn failing_fields(&self) -> Vec<String> {
        self.missing_required.clone()
    }
}

/// Outcome of checking a whole answer set offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub missing_required: Vec<String>,
    pub unknown_fields: Vec<String>,
}

/// Check the fields of one page against `source`.
///
/// Only required fields whose trimmed value is empty fail. Kind and
/// constraint checks belong to the offline [`validate`].
pub fn validate_page(
    spec: &FormSpec,
    page: usize,
    source: &impl FieldSource,
) -> Result<PageValidation, SpecError> {
    let page_spec = spec.page(page)?;
    let missing_required = page_spec
        .required_fields()
        .filter(|field| {
            source
                .field_value(&field.id)
                .is_none_or(|value| value.trim().is_empty())
        })
        .map(|field| field.id.clone())
        .collect();

    Ok(PageValidation {
        page,
        missing_required,
    })
}

/// Kind and constraint problems among the non-empty values of one page.
pub fn check_page_values(
    spec: &FormSpec,
    page: usize,
    source: &impl FieldSource,
) -> Result<Vec<ValidationError>, SpecError> {
    let page_spec = spec.page(page)?;
    Ok(page_spec
        .fields
        .iter()
        .filter_map(|field| {
            let value = source.field_value(&field.id)?;
            let text = value.trim();
            if text.is_empty() {
                return None;
            }
            validate_value(field, page, text)
        })
        .collect())
}

/// Check every page of `spec` against a JSON object of answers.
pub fn validate(spec: &FormSpec, answers: &Value) -> ValidationResult {
    let answers_map = answers.as_object().cloned().unwrap_or_default();

    let mut errors = Vec::new();
    let mut missing_required = Vec::new();
    for page in 1..=spec.total_pages() {
        if let Ok(result) = validate_page(spec, page, &answers_map) {
            missing_required.extend(result.missing_required);
        }
        if let Ok(found) = check_page_values(spec, page, &answers_map) {
            errors.extend(found);
        }
    }

    let all_ids: BTreeSet<_> = spec.fields().map(|field| field.id.as_str()).collect();
    let unknown_fields: Vec<String> = answers_map
        .keys()
        .filter(|key| !all_ids.contains(key.as_str()))
        .cloned()
        .collect();

    ValidationResult {
        valid: errors.is_empty() && missing_required.is_empty() && unknown_fields.is_empty(),
        errors,
        missing_required,
        unknown_fields,
    }
}

fn validate_value(field: &FieldSpec, page: usize, value: &str) -> Option<ValidationError> {
    if !field.kind.accepts(value) {
        return Some(base_error(
            field,
            page,
            &format!("expected a {} value", field.kind.as_str()),
            "kind_mismatch",
        ));
    }

    field
        .constraint
        .as_ref()
        .and_then(|constraint| enforce_constraint(field, page, value, constraint))
}

fn enforce_constraint(
    field: &FieldSpec,
    page: usize,
    value: &str,
    constraint: &Constraint,
) -> Option<ValidationError> {
    if let Some(pattern) = &constraint.pattern
        && let Ok(regex) = Regex::new(pattern)
        && !regex.is_match(value)
    {
        return Some(base_error(
            field,
            page,
            "value does not match pattern",
            "pattern_mismatch",
        ));
    }

    if let Some(max_len) = constraint.max_len
        && value.chars().count() > max_len
    {
        return Some(base_error(
            field,
            page,
            "value longer than max length",
            "max_length",
        ));
    }

    None
}

fn base_error(field: &FieldSpec, page: usize, message: &str, code: &str) -> ValidationError {
    ValidationError {
        field: field.id.clone(),
        page,
        message: message.into(),
        code: code.into(),
    }
}
