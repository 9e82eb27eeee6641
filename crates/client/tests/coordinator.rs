use anyhow::Result;
use formsync_client::{attach, CoordinatorConfig, FieldValues, Validate};
use formsync_core::model::{ValidationError, ValidationOutcome};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

/// Validator double that records every call and replays scripted
/// replies, optionally after a simulated network delay.
#[derive(Clone, Default)]
struct ScriptedValidator {
    state: Arc<Mutex<ScriptState>>,
}

#[derive(Default)]
struct ScriptState {
    calls: Vec<(Value, String)>,
    steps: VecDeque<Step>,
}

struct Step {
    delay: Duration,
    reply: Reply,
}

enum Reply {
    Errors(Vec<ValidationError>),
    ModelNotFound,
    LanguageNotFound,
    Unreachable,
}

impl ScriptedValidator {
    fn push(&self, delay_ms: u64, reply: Reply) {
        self.state.lock().unwrap().steps.push_back(Step {
            delay: Duration::from_millis(delay_ms),
            reply,
        });
    }

    fn calls(&self) -> Vec<(Value, String)> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl Validate for ScriptedValidator {
    async fn validate(&self, _model: &str, value: &Value, lang: &str) -> Result<ValidationOutcome> {
        let step = {
            let mut state = self.state.lock().unwrap();
            state.calls.push((value.clone(), lang.to_string()));
            state.steps.pop_front()
        };
        let step = step.unwrap_or(Step {
            delay: Duration::ZERO,
            reply: Reply::Errors(vec![]),
        });
        if !step.delay.is_zero() {
            sleep(step.delay).await;
        }
        match step.reply {
            Reply::Errors(errors) => Ok(ValidationOutcome::Errors(errors)),
            Reply::ModelNotFound => Ok(ValidationOutcome::ModelNotFound),
            Reply::LanguageNotFound => Ok(ValidationOutcome::LanguageNotFound),
            Reply::Unreachable => Err(anyhow::anyhow!("connection refused")),
        }
    }
}

fn form(fields: &[(&str, &str)]) -> FieldValues {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect()
}

fn err(field: &str, description: &str) -> ValidationError {
    ValidationError::new(field, description)
}

fn cfg(debounce_ms: u64) -> CoordinatorConfig {
    CoordinatorConfig::new("user").debounce(Duration::from_millis(debounce_ms))
}

#[tokio::test(start_paused = true)]
async fn debounce_collapses_rapid_edits_into_one_round() {
    let validator = ScriptedValidator::default();
    let (handle, _errors, _task) =
        attach(cfg(500), validator.clone(), form(&[("username", "a")]), "");

    for value in ["ab", "abc", "abcd"] {
        sleep(Duration::from_millis(100)).await;
        handle
            .values_changed(form(&[("username", value)]))
            .await
            .unwrap();
    }
    sleep(Duration::from_millis(600)).await;

    let calls = validator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, json!({"username": "abcd"}));
}

#[tokio::test(start_paused = true)]
async fn unchanged_snapshots_schedule_no_round() {
    let validator = ScriptedValidator::default();
    let values = form(&[("username", "a")]);
    let (handle, _errors, _task) = attach(cfg(100), validator.clone(), values.clone(), "");

    sleep(Duration::from_millis(150)).await;
    assert_eq!(validator.calls().len(), 1);

    handle.values_changed(values).await.unwrap();
    sleep(Duration::from_millis(150)).await;
    assert_eq!(validator.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn language_change_bypasses_a_pending_debounce_window() {
    let validator = ScriptedValidator::default();
    let (handle, _errors, _task) =
        attach(cfg(500), validator.clone(), form(&[("username", "a")]), "");

    sleep(Duration::from_millis(100)).await;
    handle
        .values_changed(form(&[("username", "ab")]))
        .await
        .unwrap();
    sleep(Duration::from_millis(100)).await;
    handle.language_changed("DE").await.unwrap();
    sleep(Duration::from_millis(50)).await;

    let calls = validator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "DE");
    assert_eq!(calls[0].0, json!({"username": "ab"}));

    // The cancelled window never fires.
    sleep(Duration::from_millis(1000)).await;
    assert_eq!(validator.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn the_latest_round_wins_regardless_of_arrival_order() {
    let validator = ScriptedValidator::default();
    validator.push(300, Reply::Errors(vec![err("username", "stale verdict")]));
    validator.push(10, Reply::Errors(vec![]));

    let (handle, errors, _task) =
        attach(cfg(50), validator.clone(), form(&[("username", "a")]), "");

    sleep(Duration::from_millis(60)).await;
    handle
        .values_changed(form(&[("username", "ab")]))
        .await
        .unwrap();
    sleep(Duration::from_millis(120)).await;

    // The second round's verdict is in; the first is still in flight.
    assert!(errors.borrow().fields["username"].remote.is_empty());

    // The slow first response arrives and must be dropped.
    sleep(Duration::from_millis(500)).await;
    assert!(errors.borrow().fields["username"].remote.is_empty());
    assert_eq!(validator.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn the_previous_verdict_stays_visible_while_a_round_is_pending() {
    let validator = ScriptedValidator::default();
    validator.push(0, Reply::Errors(vec![err("username", "must be longer")]));
    validator.push(1000, Reply::Errors(vec![]));

    let (handle, errors, _task) =
        attach(cfg(50), validator.clone(), form(&[("username", "a")]), "");

    sleep(Duration::from_millis(60)).await;
    assert_eq!(errors.borrow().fields["username"].remote, vec!["must be longer"]);

    handle
        .values_changed(form(&[("username", "ab")]))
        .await
        .unwrap();
    sleep(Duration::from_millis(10)).await;

    // Cache re-applied immediately, no flicker to "unvalidated".
    assert_eq!(errors.borrow().fields["username"].remote, vec!["must be longer"]);

    sleep(Duration::from_millis(100)).await;
    assert_eq!(validator.calls().len(), 2);
    assert_eq!(errors.borrow().fields["username"].remote, vec!["must be longer"]);

    sleep(Duration::from_millis(1000)).await;
    assert!(errors.borrow().fields["username"].remote.is_empty());
}

#[tokio::test(start_paused = true)]
async fn transport_failure_keeps_the_last_known_good_verdict() {
    let validator = ScriptedValidator::default();
    validator.push(0, Reply::Errors(vec![err("username", "must be longer")]));
    validator.push(0, Reply::Unreachable);

    let (handle, errors, _task) =
        attach(cfg(50), validator.clone(), form(&[("username", "a")]), "");

    sleep(Duration::from_millis(60)).await;
    handle
        .values_changed(form(&[("username", "ab")]))
        .await
        .unwrap();
    sleep(Duration::from_millis(100)).await;

    assert_eq!(validator.calls().len(), 2);
    let projection = errors.borrow();
    assert_eq!(projection.fields["username"].remote, vec!["must be longer"]);
    assert!(projection.form_error.is_none());
}

#[tokio::test(start_paused = true)]
async fn unknown_model_surfaces_a_form_level_error() {
    let validator = ScriptedValidator::default();
    validator.push(0, Reply::ModelNotFound);

    let (handle, errors, _task) =
        attach(cfg(50), validator.clone(), form(&[("username", "a")]), "");

    sleep(Duration::from_millis(60)).await;
    {
        let projection = errors.borrow();
        assert_eq!(projection.form_error.as_deref(), Some("model not found"));
        assert!(projection.fields["username"].remote.is_empty());
    }

    // The next applied verdict clears the form-level error.
    handle
        .values_changed(form(&[("username", "ab")]))
        .await
        .unwrap();
    sleep(Duration::from_millis(100)).await;
    assert!(errors.borrow().form_error.is_none());
}

#[tokio::test(start_paused = true)]
async fn unsupported_language_surfaces_a_form_level_error() {
    let validator = ScriptedValidator::default();
    validator.push(0, Reply::LanguageNotFound);

    let (handle, errors, _task) =
        attach(cfg(50), validator.clone(), form(&[("username", "a")]), "FR");

    sleep(Duration::from_millis(60)).await;
    assert_eq!(errors.borrow().form_error.as_deref(), Some("language not found"));

    handle.language_changed("").await.unwrap();
    sleep(Duration::from_millis(50)).await;
    assert!(errors.borrow().form_error.is_none());
}

#[tokio::test(start_paused = true)]
async fn the_mapper_shapes_the_submitted_payload() {
    let validator = ScriptedValidator::default();
    let config = cfg(50).mapper(|values| {
        let interests: Vec<Value> = values
            .get("interests")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| json!(s))
            .collect();
        json!({"interests": interests})
    });

    let (_handle, _errors, _task) = attach(
        config,
        validator.clone(),
        form(&[("interests", "coding, music")]),
        "",
    );

    sleep(Duration::from_millis(60)).await;
    let calls = validator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, json!({"interests": ["coding", "music"]}));
}
