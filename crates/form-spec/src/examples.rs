use serde_json::{Map, Value};

use crate::spec::{
    field::{FieldKind, FieldSpec},
    form::FormSpec,
};

/// Example answers covering every field, webhook field included.
pub fn generate(spec: &FormSpec) -> Value {
    let mut map = Map::new();
    for field in spec.fields() {
        map.insert(field.id.clone(), Value::String(example_value(field)));
    }
    Value::Object(map)
}

fn example_value(field: &FieldSpec) -> String {
    match field.kind {
        FieldKind::Number => "50".into(),
        FieldKind::Url => "https://hook.example.com/proposal".into(),
        FieldKind::Email => "client@example.com".into(),
        FieldKind::Text | FieldKind::Textarea => format!("example-{}", field.id),
    }
}
