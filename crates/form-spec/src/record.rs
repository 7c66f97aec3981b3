use std::collections::{BTreeMap, HashMap};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::SpecError;
use crate::spec::form::FormSpec;

/// Anything that can report the current value of a named field.
///
/// `None` means the field does not exist at all, which is different from an
/// existing field holding an empty string.
pub trait FieldSource {
    fn field_value(&self, id: &str) -> Option<String>;
}

impl FieldSource for BTreeMap<String, String> {
    fn field_value(&self, id: &str) -> Option<String> {
        self.get(id).cloned()
    }
}

impl FieldSource for HashMap<String, String> {
    fn field_value(&self, id: &str) -> Option<String> {
        self.get(id).cloned()
    }
}

impl FieldSource for Map<String, Value> {
    fn field_value(&self, id: &str) -> Option<String> {
        match self.get(id)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Flat snapshot of the form, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRecord {
    entries: Vec<(String, String)>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, keeping the position of an existing key.
    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<String>) {
        let id = id.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((id, value)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for FieldRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl FieldSource for FieldRecord {
    fn field_value(&self, id: &str) -> Option<String> {
        self.get(id).map(str::to_string)
    }
}

/// Read every record field from `source`.
///
/// Optional fields fall back to their default when absent or empty. Required
/// fields are taken verbatim, and a required field the source does not know
/// about is an error.
pub fn collect(spec: &FormSpec, source: &impl FieldSource) -> Result<FieldRecord, SpecError> {
    let mut record = FieldRecord::new();
    for field in spec.record_fields() {
        let value = match (source.field_value(&field.id), field.required) {
            (Some(value), true) => value,
            (None, true) => return Err(SpecError::MissingField(field.id.clone())),
            (Some(value), false) if !value.is_empty() => value,
            (_, false) => field.default_value().to_string(),
        };
        record.insert(field.id.clone(), value);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;

    fn filled_proposal() -> BTreeMap<String, String> {
        let spec = builtin::proposal().expect("builtin");
        spec.fields()
            .filter(|field| field.required)
            .map(|field| (field.id.clone(), format!("value-{}", field.id)))
            .collect()
    }

    #[test]
    fn record_follows_schema_order() {
        let spec = builtin::proposal().expect("builtin");
        let record = collect(&spec, &filled_proposal()).expect("collect");
        let keys = record.keys().collect::<Vec<_>>();
        assert_eq!(keys.first(), Some(&"companyName"));
        assert_eq!(keys.last(), Some(&"platform2Price"));
        let json = record.to_json_string().expect("json");
        assert!(json.starts_with("{\"companyName\":"));
    }

    #[test]
    fn webhook_field_is_not_collected() {
        let spec = builtin::proposal().expect("builtin");
        let record = collect(&spec, &filled_proposal()).expect("collect");
        assert!(record.get("webhookUrl").is_none());
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let spec = builtin::proposal().expect("builtin");
        let mut values = filled_proposal();
        values.insert("platform1Name".into(), String::new());
        let record = collect(&spec, &values).expect("collect");
        assert_eq!(record.get("platform1Name"), Some(""));
        assert_eq!(record.get("proposalSubtitle"), Some(""));
    }

    #[test]
    fn required_values_are_not_trimmed() {
        let spec = builtin::proposal().expect("builtin");
        let mut values = filled_proposal();
        values.insert("clientName".into(), "  Jane  ".into());
        let record = collect(&spec, &values).expect("collect");
        assert_eq!(record.get("clientName"), Some("  Jane  "));
    }

    #[test]
    fn missing_required_field_fails() {
        let spec = builtin::proposal().expect("builtin");
        let mut values = filled_proposal();
        values.remove("depositAmount");
        let err = collect(&spec, &values).expect_err("missing field");
        assert!(matches!(err, SpecError::MissingField(id) if id == "depositAmount"));
    }

    #[test]
    fn json_map_source_stringifies_scalars() {
        let map = serde_json::json!({ "a": "x", "b": 3, "c": null })
            .as_object()
            .cloned()
            .expect("object");
        assert_eq!(map.field_value("a").as_deref(), Some("x"));
        assert_eq!(map.field_value("b").as_deref(), Some("3"));
        assert_eq!(map.field_value("c"), None);
    }
}
