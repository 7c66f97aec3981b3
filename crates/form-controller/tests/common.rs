#![allow(dead_code)]

use form_controller::MemoryView;
use form_spec::{FieldKind, FormSpec};

/// Fill every required field on `page` with a value its kind accepts.
pub fn fill_page(view: &mut MemoryView, spec: &FormSpec, page: usize, webhook_url: &str) {
    let page_spec = spec.page(page).expect("page");
    for field in page_spec.required_fields() {
        let value = match field.kind {
            FieldKind::Number => "50".to_string(),
            FieldKind::Url => webhook_url.to_string(),
            FieldKind::Email => "client@example.com".to_string(),
            FieldKind::Text | FieldKind::Textarea => format!("{} value", field.label),
        };
        view.set_value(field.id.clone(), value);
    }
}

pub fn fill_all(view: &mut MemoryView, spec: &FormSpec, webhook_url: &str) {
    for page in 1..=spec.total_pages() {
        fill_page(view, spec, page, webhook_url);
    }
}
