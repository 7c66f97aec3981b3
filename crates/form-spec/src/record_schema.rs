use serde_json::{Map, Value, json};

use crate::spec::{
    field::{FieldKind, FieldSpec},
    form::FormSpec,
};

/// JSON Schema describing the record posted to the webhook.
pub fn generate(spec: &FormSpec) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in spec.record_fields() {
        properties.insert(field.id.clone(), field_schema(field));
        // Optional fields are always present in the record, with their default.
        required.push(Value::String(field.id.clone()));
    }

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": format!("{} record", spec.title),
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn field_schema(field: &FieldSpec) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("title".into(), Value::String(field.label.clone()));
    match field.kind {
        FieldKind::Url => {
            schema.insert("format".into(), Value::String("uri".into()));
        }
        FieldKind::Email => {
            schema.insert("format".into(), Value::String("email".into()));
        }
        FieldKind::Text | FieldKind::Textarea | FieldKind::Number => {}
    }
    if field.required {
        schema.insert("minLength".into(), Value::from(1));
    } else {
        schema.insert("default".into(), Value::String(field.default_value().to_string()));
    }
    if let Some(constraint) = &field.constraint {
        if let Some(pattern) = &constraint.pattern {
            schema.insert("pattern".into(), Value::String(pattern.clone()));
        }
        if let Some(max_len) = constraint.max_len {
            schema.insert("maxLength".into(), Value::from(max_len));
        }
    }
    Value::Object(schema)
}
