use serde_json::{Map, Value, json};

use crate::{
    error::SpecError,
    progress::{NavigationState, Progress, navigation},
    record::FieldSource,
    spec::{field::FieldKind, form::FormSpec},
    template::TemplateEngine,
};

/// Describes a single field for render outputs.
#[derive(Debug, Clone)]
pub struct RenderField {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<String>,
    pub current_value: Option<String>,
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct PagePayload {
    pub form_id: String,
    pub form_title: String,
    pub form_version: String,
    pub page: usize,
    pub page_title: String,
    pub help: Option<String>,
    pub progress: Progress,
    pub navigation: NavigationState,
    pub fields: Vec<RenderField>,
}

/// Build the renderer payload for one page.
pub fn build_page_payload(
    spec: &FormSpec,
    templates: &TemplateEngine,
    page: usize,
    source: &impl FieldSource,
) -> Result<PagePayload, SpecError> {
    let page_spec = spec.page(page)?;
    let total = spec.total_pages();

    let fields = page_spec
        .fields
        .iter()
        .map(|field| RenderField {
            id: field.id.clone(),
            label: field.label.clone(),
            kind: field.kind,
            required: field.required,
            placeholder: field.placeholder.clone(),
            current_value: source.field_value(&field.id),
        })
        .collect::<Vec<_>>();

    let help = page_spec
        .description
        .clone()
        .or_else(|| (page == 1).then(|| spec.description.clone()).flatten());

    Ok(PagePayload {
        form_id: spec.id.clone(),
        form_title: spec.title.clone(),
        form_version: spec.version.clone(),
        page,
        page_title: page_spec.title.clone(),
        help,
        progress: Progress::new(templates, page, total)?,
        navigation: navigation(page, total),
        fields,
    })
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &PagePayload) -> Value {
    let fields = payload
        .fields
        .iter()
        .map(|field| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(field.id.clone()));
            map.insert("label".into(), Value::String(field.label.clone()));
            map.insert("kind".into(), Value::String(field.kind.as_str().to_string()));
            map.insert("required".into(), Value::Bool(field.required));
            if let Some(placeholder) = &field.placeholder {
                map.insert("placeholder".into(), Value::String(placeholder.clone()));
            }
            if let Some(current_value) = &field.current_value {
                map.insert("current_value".into(), Value::String(current_value.clone()));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "form_id": payload.form_id,
        "form_title": payload.form_title,
        "form_version": payload.form_version,
        "page": payload.page,
        "page_title": payload.page_title,
        "help": payload.help,
        "progress": payload.progress,
        "navigation": payload.navigation,
        "fields": fields,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &PagePayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {} ({})", payload.form_title, payload.form_id));
    lines.push(format!(
        "{} ({:.0}%) - {}",
        payload.progress.text, payload.progress.percentage, payload.page_title
    ));
    if let Some(help) = &payload.help {
        lines.push(format!("Help: {}", help));
    }

    lines.push("Fields:".to_string());
    for field in &payload.fields {
        let mut entry = format!(" - {} ({})", field.id, field.label);
        if field.required {
            entry.push_str(" [required]");
        }
        if let Some(value) = field.current_value.as_deref().filter(|value| !value.is_empty()) {
            entry.push_str(&format!(" = {}", value));
        }
        lines.push(entry);
    }

    let mut controls = Vec::new();
    if !payload.navigation.previous_disabled {
        controls.push("previous");
    }
    if !payload.navigation.next_hidden {
        controls.push("next");
    }
    if payload.navigation.submit_visible {
        controls.push("submit");
    }
    lines.push(format!("Controls: {}", controls.join(", ")));

    lines.join("\n")
}
