use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported input kinds for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Textarea,
    Url,
    Number,
    Email,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea => "textarea",
            FieldKind::Url => "url",
            FieldKind::Number => "number",
            FieldKind::Email => "email",
        }
    }

    /// Whether a non-empty value has the shape this kind expects.
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            FieldKind::Text | FieldKind::Textarea => true,
            FieldKind::Number => value.parse::<f64>().is_ok_and(f64::is_finite),
            FieldKind::Url => value.starts_with("http://") || value.starts_with("https://"),
            FieldKind::Email => value
                .split_once('@')
                .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.')),
        }
    }
}

/// Extra checks applied to non-empty values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Constraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
}

/// A single named input on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Value used for an optional field left blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
}

impl FieldSpec {
    pub fn default_value(&self) -> &str {
        self.default.as_deref().unwrap_or("")
    }
}
