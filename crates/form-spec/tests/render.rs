use std::collections::BTreeMap;

use form_spec::{
    FormSpec, TemplateEngine, build_page_payload, builtin, example_record, record_schema,
    render_json_ui, render_text,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "two_page_form" => include_str!("../tests/fixtures/two_page_form.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

#[test]
fn render_text_lists_page_fields() {
    let spec = FormSpec::from_json(fixture("two_page_form")).expect("deserialize");
    let templates = TemplateEngine::new(&spec.presentation).expect("templates");
    let values = BTreeMap::from([("name".to_string(), "Ada".to_string())]);
    let payload = build_page_payload(&spec, &templates, 1, &values).expect("payload");

    let text = render_text(&payload);
    assert!(text.contains("Step 1 of 2 (50%) - About"));
    assert!(text.contains(" - name (Name) [required] = Ada"));
    assert!(text.contains("Help: Small form used by tests."));
    assert!(text.ends_with("Controls: next"));
}

#[test]
fn render_json_ui_exposes_navigation() {
    let spec = builtin::proposal().expect("builtin");
    let templates = TemplateEngine::new(&spec.presentation).expect("templates");
    let values = BTreeMap::<String, String>::new();
    let payload = build_page_payload(&spec, &templates, 4, &values).expect("payload");

    let ui = render_json_ui(&payload);
    assert_eq!(ui["form_id"], "proposal");
    assert_eq!(ui["progress"]["text"], "Step 4 of 4");
    assert_eq!(ui["progress"]["percentage"], 100.0);
    assert_eq!(ui["navigation"]["next_hidden"], true);
    assert_eq!(ui["navigation"]["submit_visible"], true);
    let fields = ui["fields"].as_array().expect("fields");
    assert!(fields.iter().any(|field| field["id"] == "webhookUrl"));
}

#[test]
fn record_schema_excludes_webhook_field() {
    let spec = builtin::detailed().expect("builtin");
    let schema = record_schema(&spec);
    let props = schema["properties"].as_object().expect("properties");
    assert!(props.contains_key("timelineWeeks"));
    assert!(!props.contains_key("webhookUrl"));
    assert_eq!(
        props["closingNotes"]["default"],
        "Thank you for your consideration."
    );
    assert_eq!(schema["additionalProperties"], false);
}

#[test]
fn example_record_passes_validation() {
    let spec = builtin::detailed().expect("builtin");
    let example = example_record(&spec);
    let result = form_spec::validate(&spec, &example);
    assert!(result.valid, "{:?}", result);
}
