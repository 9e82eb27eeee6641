use anyhow::Result;
use clap::Parser;
use formsync_client::{attach, CoordinatorConfig, FieldValues, FormErrors, HttpValidator};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "formsync-client", version, about = "Interactive form driver for the validation server")]
struct Cli {
    /// Server base URL, e.g. http://127.0.0.1:3000
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Model to validate against.
    #[arg(long, default_value = "user")]
    model: String,

    /// Initial language tag (empty = default language).
    #[arg(long, default_value = "")]
    lang: String,

    /// Debounce window in milliseconds.
    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,
}

enum Input {
    Line(Option<String>),
    ErrorsChanged(bool),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut values = empty_user_form();

    let cfg = CoordinatorConfig::new(&cli.model)
        .debounce(Duration::from_millis(cli.debounce_ms))
        .mapper(user_form_mapper);
    let validator = HttpValidator::new(&cli.server);
    let (handle, mut errors_rx, task) = attach(cfg, validator, values.clone(), cli.lang);

    info!("type `field=value` to edit, `lang XX` to switch language, `quit` to exit");

    // Blocking stdin reader feeding the async loop.
    let (lines_tx, mut lines_rx) = tokio::sync::mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        use std::io::BufRead;
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if lines_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    loop {
        let input = tokio::select! {
            line = lines_rx.recv() => Input::Line(line),
            changed = errors_rx.changed() => Input::ErrorsChanged(changed.is_ok()),
        };
        match input {
            Input::Line(None) => break,
            Input::Line(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "quit" {
                    break;
                }
                if let Some(lang) = line.strip_prefix("lang ") {
                    handle.language_changed(lang.trim()).await?;
                } else if let Some((field, value)) = line.split_once('=') {
                    let (field, value) = (field.trim(), value.trim());
                    if !values.contains_key(field) {
                        eprintln!("unknown field '{field}'");
                        continue;
                    }
                    values.insert(field.to_string(), Value::String(value.to_string()));
                    handle.values_changed(values.clone()).await?;
                } else {
                    eprintln!("expected `field=value` or `lang XX`");
                }
            }
            Input::ErrorsChanged(false) => break,
            Input::ErrorsChanged(true) => print_errors(&errors_rx.borrow_and_update()),
        }
    }

    task.abort();
    Ok(())
}

fn empty_user_form() -> FieldValues {
    ["username", "email", "age", "interests"]
        .into_iter()
        .map(|name| (name.to_string(), Value::String(String::new())))
        .collect()
}

/// Map the raw form strings to the user model's data structure: the
/// comma-separated interests become an array, age becomes a number.
fn user_form_mapper(values: &FieldValues) -> Value {
    let text = |name: &str| {
        values
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let interests: Vec<Value> = text("interests")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Value::String(s.to_string()))
        .collect();
    let raw_age = text("age");
    let age = raw_age
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or(Value::String(raw_age));
    json!({
        "username": text("username"),
        "email": text("email"),
        "age": age,
        "interests": interests,
    })
}

fn print_errors(errors: &FormErrors) {
    if let Some(msg) = &errors.form_error {
        println!("! {msg}");
        return;
    }
    for (field, state) in &errors.fields {
        if state.remote.is_empty() {
            println!("  {field}: ok");
        } else {
            println!("  {field}: {}", state.remote.join("; "));
        }
    }
    println!();
}
