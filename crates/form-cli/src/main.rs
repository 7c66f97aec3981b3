mod wizard;

use clap::{Parser, Subcommand, ValueEnum};
use form_controller::{
    ControllerError, FormController, MemoryView, Navigation, SubmitOutcome, WebhookClient,
};
use form_spec::{
    FieldSource, FormSpec, ValidationResult, build_page_payload, builtin, example_record,
    record_schema, render_json_ui, render_text, validate,
};
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use wizard::{Action, TerminalView, Verbosity, action_hint, field_prompt, parse_field_input};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const WEBHOOK_ENV: &str = "PROPOSAL_WEBHOOK_URL";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Multi-step proposal form",
    long_about = "Fills in a multi-page proposal form and posts the result to a webhook"
)]
struct Cli {
    /// Log at debug level regardless of RUST_LOG.
    #[arg(long, global = true, alias = "debug")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DescribeFormat {
    Text,
    Json,
    /// JSON Schema of the record posted to the webhook.
    Schema,
    /// Example answers covering every field.
    Example,
    /// JSON Schema of the form definition format.
    SpecSchema,
}

#[derive(Subcommand)]
enum Command {
    /// Fill in a form interactively and submit it.
    Run {
        /// Built-in form name or path to a form JSON file.
        #[arg(long, value_name = "FORM", default_value = "proposal")]
        form: String,
        /// Webhook URL (falls back to PROPOSAL_WEBHOOK_URL).
        #[arg(long, value_name = "URL")]
        webhook_url: Option<String>,
        /// Optional JSON file with initial field values.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
    },
    /// Submit a record file without prompting.
    Submit {
        /// Built-in form name or path to a form JSON file.
        #[arg(long, value_name = "FORM", default_value = "proposal")]
        form: String,
        /// JSON object of field values.
        #[arg(long, value_name = "RECORD")]
        record: PathBuf,
        /// Webhook URL (overrides the record, falls back to PROPOSAL_WEBHOOK_URL).
        #[arg(long, value_name = "URL")]
        webhook_url: Option<String>,
    },
    /// Validate a record file against every page of a form.
    Validate {
        /// Built-in form name or path to a form JSON file.
        #[arg(long, value_name = "FORM", default_value = "proposal")]
        form: String,
        /// JSON object of field values.
        #[arg(long, value_name = "RECORD")]
        record: PathBuf,
    },
    /// Print a form's pages, record schema or example answers.
    Describe {
        /// Built-in form name or path to a form JSON file.
        #[arg(long, value_name = "FORM", default_value = "proposal")]
        form: String,
        #[arg(long, value_enum, default_value_t = DescribeFormat::Text)]
        format: DescribeFormat,
        /// Only describe this page.
        #[arg(long, value_name = "PAGE")]
        page: Option<usize>,
    },
    /// List the built-in forms.
    Forms,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Run {
            form,
            webhook_url,
            answers,
        } => run_wizard(&form, webhook_url, answers, cli.verbose),
        Command::Submit {
            form,
            record,
            webhook_url,
        } => run_submit(&form, &record, webhook_url),
        Command::Validate { form, record } => run_validate(&form, &record),
        Command::Describe { form, format, page } => run_describe(&form, format, page),
        Command::Forms => run_forms(),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Resolve a built-in form name or read a form definition from disk.
fn load_form(form: &str) -> CliResult<FormSpec> {
    if builtin::names().contains(&form) {
        return Ok(builtin::by_name(form)?);
    }
    let path = Path::new(form);
    if !path.exists() {
        return Err(format!(
            "form '{}' is neither a built-in ({}) nor an existing file",
            form,
            builtin::names().join(", ")
        )
        .into());
    }
    let contents = fs::read_to_string(path)?;
    Ok(FormSpec::from_json(&contents)?)
}

fn load_record(path: &Path) -> CliResult<Map<String, Value>> {
    let contents = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(format!("record {} must be a JSON object", path.display()).into()),
    }
}

fn resolve_webhook_url(explicit: Option<String>) -> Option<String> {
    explicit
        .or_else(|| env::var(WEBHOOK_ENV).ok())
        .filter(|url| !url.trim().is_empty())
}

fn build_runtime() -> CliResult<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn run_forms() -> CliResult<()> {
    for name in builtin::names() {
        let spec = builtin::by_name(name)?;
        println!("{} - {} ({} pages)", name, spec.title, spec.total_pages());
    }
    Ok(())
}

fn run_describe(form: &str, format: DescribeFormat, page: Option<usize>) -> CliResult<()> {
    let spec = load_form(form)?;
    let pages = match page {
        Some(page) => {
            spec.page(page)?;
            vec![page]
        }
        None => (1..=spec.total_pages()).collect(),
    };
    let controller = FormController::new(spec)?;
    let spec = controller.spec();
    let empty = Map::new();

    match format {
        DescribeFormat::Text => {
            let sections = pages
                .iter()
                .map(|page| {
                    build_page_payload(spec, controller.templates(), *page, &empty)
                        .map(|payload| render_text(&payload))
                })
                .collect::<Result<Vec<_>, _>>()?;
            println!("{}", sections.join("\n\n"));
        }
        DescribeFormat::Json => {
            let payloads = pages
                .iter()
                .map(|page| {
                    build_page_payload(spec, controller.templates(), *page, &empty)
                        .map(|payload| render_json_ui(&payload))
                })
                .collect::<Result<Vec<_>, _>>()?;
            println!("{}", serde_json::to_string_pretty(&payloads)?);
        }
        DescribeFormat::Schema => {
            println!("{}", serde_json::to_string_pretty(&record_schema(spec))?);
        }
        DescribeFormat::Example => {
            println!("{}", serde_json::to_string_pretty(&example_record(spec))?);
        }
        DescribeFormat::SpecSchema => {
            println!("{}", serde_json::to_string_pretty(&FormSpec::json_schema()?)?);
        }
    }
    Ok(())
}

fn run_validate(form: &str, record_path: &Path) -> CliResult<()> {
    let spec = load_form(form)?;
    let record = load_record(record_path)?;

    let result = validate(&spec, &Value::Object(record));
    println!(
        "Validation result: {}",
        if result.valid { "valid" } else { "invalid" }
    );
    describe_validation(&result);

    if result.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("Errors:");
        for error in &result.errors {
            println!(
                "  page {} / {} - {}",
                error.page, error.field, error.message
            );
        }
    }
    if !result.missing_required.is_empty() {
        println!(
            "Missing required fields: {}",
            result.missing_required.join(", ")
        );
    }
    if !result.unknown_fields.is_empty() {
        println!("Unknown fields: {}", result.unknown_fields.join(", "));
    }
}

/// Walk every page through the controller, then submit.
fn run_submit(form: &str, record_path: &Path, webhook_url: Option<String>) -> CliResult<()> {
    let spec = load_form(form)?;
    let record = load_record(record_path)?;
    let mut view = MemoryView::for_form(&spec);
    for key in record.keys() {
        match (spec.field(key), record.field_value(key)) {
            (Some(_), Some(value)) => view.set_value(key.clone(), value),
            (Some(_), None) => {}
            (None, _) => warn!(field = %key, "ignoring field unknown to form"),
        }
    }
    if let Some(url) = resolve_webhook_url(webhook_url) {
        view.set_value(spec.webhook_field.clone(), url);
    }

    let mut controller = FormController::new(spec)?;
    controller.initialize(&mut view)?;
    while controller.current_page() < controller.total_pages() {
        if controller.next_page(&mut view)? == Navigation::Blocked {
            report_blocked(&controller, &view);
            return Err(format!("page {} is incomplete", controller.current_page()).into());
        }
    }

    let runtime = build_runtime()?;
    let webhook = WebhookClient::new();
    match runtime.block_on(controller.handle_submit(&mut view, &webhook))? {
        SubmitOutcome::Delivered { status } => {
            if let Some(message) = &view.modal {
                println!("{}", message);
            }
            println!("Delivered (HTTP {})", status);
            Ok(())
        }
        SubmitOutcome::Blocked => {
            report_blocked(&controller, &view);
            Err(format!("page {} is incomplete", controller.current_page()).into())
        }
    }
}

fn report_blocked(controller: &FormController, view: &MemoryView) {
    if let Some(alert) = view.last_alert() {
        eprintln!("{}", alert);
    }
    let fields = controller.flagged_fields().collect::<Vec<_>>();
    eprintln!(
        "Page {} fields needing attention: {}",
        controller.current_page(),
        fields.join(", ")
    );
}

fn run_wizard(
    form: &str,
    webhook_url: Option<String>,
    answers_path: Option<PathBuf>,
    verbose: bool,
) -> CliResult<()> {
    let spec = load_form(form)?;
    let verbosity = Verbosity::from_verbose(verbose);
    let mut view = TerminalView::new(&spec, verbosity);
    if let Some(path) = answers_path {
        let answers = load_record(&path)?;
        for field in spec.fields() {
            if let Some(value) = answers.field_value(&field.id) {
                view.set_value(&field.id, value);
            }
        }
    }
    if let Some(url) = resolve_webhook_url(webhook_url) {
        view.set_initial(&spec.webhook_field, url);
    }

    let runtime = build_runtime()?;
    let webhook = WebhookClient::new();
    let mut controller = FormController::new(spec)?;
    println!("Form: {}", controller.spec().title);
    controller.initialize(&mut view)?;

    loop {
        if controller.is_modal_open() {
            let line = prompt_line("Press Enter to start a new proposal or q to quit")?;
            if matches!(Action::parse(&line), Some(Action::Quit)) {
                return Ok(());
            }
            controller.close_success_modal(&mut view)?;
            continue;
        }

        if verbosity.is_verbose() {
            let payload = build_page_payload(
                controller.spec(),
                controller.templates(),
                controller.current_page(),
                &view,
            )?;
            println!("{}", render_text(&payload));
        }
        prompt_page_fields(&mut controller, &mut view)?;

        let action = loop {
            let raw = prompt_line(&action_hint(view.navigation()))?;
            match Action::parse(&raw) {
                Some(action) if action.is_offered(view.navigation()) => break action,
                Some(_) => println!("Submit is only available on the last page."),
                None => println!("Unknown command '{}'.", raw),
            }
        };

        match action {
            Action::Next => {
                controller.next_page(&mut view)?;
            }
            Action::Previous => {
                controller.previous_page(&mut view)?;
            }
            Action::Key(key) => {
                controller.handle_key(&mut view, key, Action::focus())?;
            }
            Action::Submit => {
                match runtime.block_on(controller.handle_submit(&mut view, &webhook)) {
                    Ok(_) => {}
                    Err(ControllerError::Webhook(err)) => {
                        debug!(error = %err, "webhook failure already shown");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Action::Edit => {}
            Action::Quit => {
                println!("Aborted.");
                return Ok(());
            }
        }
    }
}

fn prompt_page_fields(controller: &mut FormController, view: &mut TerminalView) -> CliResult<()> {
    let page = controller.spec().page(controller.current_page())?.clone();
    if let Some(description) = &page.description {
        println!("{}", description);
    }
    for field in &page.fields {
        let current = view.field_value(&field.id).unwrap_or_default();
        let prompt = field_prompt(field, &current, view.is_flagged(&field.id));
        let raw = prompt_line(&prompt)?;
        if let Some(value) = parse_field_input(field, &raw) {
            view.set_value(&field.id, value);
            controller.on_field_input(view, &field.id);
        }
    }
    Ok(())
}

fn prompt_line(prompt: &str) -> CliResult<String> {
    print!("{}: ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err("input closed before the form was finished".into());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use predicates::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn complete_answers(webhook_url: &str) -> Value {
        let spec = builtin::proposal().expect("builtin");
        let mut answers = example_record(&spec);
        answers["webhookUrl"] = Value::String(webhook_url.to_string());
        answers
    }

    fn write_json(dir: &assert_fs::TempDir, name: &str, value: &Value) -> PathBuf {
        let file = dir.child(name);
        file.write_str(&serde_json::to_string_pretty(value).expect("json"))
            .expect("write");
        file.path().to_path_buf()
    }

    #[test]
    fn load_form_resolves_builtins_and_files() {
        assert_eq!(load_form("detailed").expect("builtin").total_pages(), 7);

        let dir = TempDir::new().expect("temp dir");
        let spec = builtin::proposal().expect("builtin");
        let path = dir.path().join("form.json");
        fs::write(&path, serde_json::to_string(&spec).expect("json")).expect("write");
        let loaded = load_form(path.to_str().expect("utf8")).expect("file");
        assert_eq!(loaded, spec);

        assert!(load_form("no-such-form").is_err());
    }

    #[test]
    fn load_record_requires_object() {
        let dir = assert_fs::TempDir::new().expect("temp dir");
        let path = write_json(&dir, "record.json", &json!(["a"]));
        assert!(load_record(&path).is_err());
    }

    #[test]
    fn explicit_webhook_url_wins_and_blank_is_ignored() {
        assert_eq!(
            resolve_webhook_url(Some("https://a.example".into())).as_deref(),
            Some("https://a.example")
        );
        assert_eq!(resolve_webhook_url(Some("  ".into())), None);
    }

    #[test]
    fn describe_prints_progress_for_each_page() {
        Command::cargo_bin("proposal-form")
            .expect("binary")
            .args(["describe", "--form", "proposal"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Step 1 of 4"))
            .stdout(predicate::str::contains("Step 4 of 4"))
            .stdout(predicate::str::contains("webhookUrl (Webhook URL) [required]"));
    }

    #[test]
    fn describe_rejects_page_out_of_range() {
        Command::cargo_bin("proposal-form")
            .expect("binary")
            .args(["describe", "--form", "proposal", "--page", "5"])
            .assert()
            .failure();
    }

    #[test]
    fn validate_reports_missing_fields() {
        let dir = assert_fs::TempDir::new().expect("temp dir");
        let path = write_json(&dir, "record.json", &json!({ "companyName": "Acme" }));
        Command::cargo_bin("proposal-form")
            .expect("binary")
            .args(["validate", "--form", "proposal", "--record"])
            .arg(&path)
            .assert()
            .failure()
            .stdout(predicate::str::contains("Validation result: invalid"))
            .stdout(predicate::str::contains("clientName"));
    }

    #[test]
    fn validate_accepts_complete_record() {
        let dir = assert_fs::TempDir::new().expect("temp dir");
        let path = write_json(&dir, "record.json", &complete_answers("https://hook.example.com"));
        Command::cargo_bin("proposal-form")
            .expect("binary")
            .args(["validate", "--form", "proposal", "--record"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Validation result: valid"));
    }

    #[test]
    fn submit_stops_on_incomplete_page() {
        let dir = assert_fs::TempDir::new().expect("temp dir");
        let mut answers = complete_answers("https://hook.example.com");
        answers["depositContext"] = Value::String("  ".into());
        let path = write_json(&dir, "record.json", &answers);
        Command::cargo_bin("proposal-form")
            .expect("binary")
            .args(["submit", "--form", "proposal", "--record"])
            .arg(&path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("depositContext"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn submit_posts_record_to_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dir = assert_fs::TempDir::new().expect("temp dir");
        let path = write_json(&dir, "record.json", &complete_answers("https://unused.example"));
        Command::cargo_bin("proposal-form")
            .expect("binary")
            .args(["submit", "--form", "proposal", "--record"])
            .arg(&path)
            .arg("--webhook-url")
            .arg(format!("{}/hook", server.uri()))
            .assert()
            .success()
            .stdout(predicate::str::contains("Delivered (HTTP 200)"));

        server.verify().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn run_wizard_walks_pages_from_stdin() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dir = assert_fs::TempDir::new().expect("temp dir");
        let answers = write_json(&dir, "answers.json", &complete_answers("https://unused.example"));
        // Four pages of prefilled fields: keep every value, move on, then submit.
        let spec = builtin::proposal().expect("builtin");
        let mut lines = Vec::new();
        for page in 1..=spec.total_pages() {
            let fields = spec.page(page).expect("page").fields.len();
            lines.extend(std::iter::repeat_n("", fields));
            lines.push(if page == spec.total_pages() { "s" } else { "n" });
        }
        lines.push("q");
        let stdin = format!("{}\n", lines.join("\n"));

        Command::cargo_bin("proposal-form")
            .expect("binary")
            .args(["run", "--form", "proposal", "--answers"])
            .arg(&answers)
            .arg("--webhook-url")
            .arg(format!("{}/hook", server.uri()))
            .write_stdin(stdin)
            .assert()
            .success()
            .stdout(predicate::str::contains("Step 4 of 4"))
            .stdout(predicate::str::contains("Your proposal has been submitted."));

        server.verify().await;
    }
}
