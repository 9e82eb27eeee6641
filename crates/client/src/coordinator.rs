use anyhow::Result;
use formsync_core::model::{ValidationError, ValidationOutcome, LANGUAGE_NOT_FOUND, MODEL_NOT_FOUND};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::projection::FormErrors;
use crate::validate::Validate;

/// Current raw values of the observed form, keyed by field name.
pub type FieldValues = BTreeMap<String, Value>;

/// Maps the raw form snapshot to the candidate value submitted for
/// validation (e.g. splitting a comma-separated list, parsing numbers).
pub type Mapper = Box<dyn Fn(&FieldValues) -> Value + Send>;

/// Tunables for one attached coordinator.
pub struct CoordinatorConfig {
    pub model: String,
    /// Quiet period after the last edit before a round is issued.
    /// A tunable, not a contract.
    pub debounce: Duration,
    pub mapper: Option<Mapper>,
}

impl CoordinatorConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            debounce: Duration::from_millis(500),
            mapper: None,
        }
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn mapper(mut self, mapper: impl Fn(&FieldValues) -> Value + Send + 'static) -> Self {
        self.mapper = Some(Box::new(mapper));
        self
    }
}

#[derive(Debug)]
enum FormEvent {
    ValuesChanged(FieldValues),
    LanguageChanged(String),
}

/// The form side's handle for feeding events to the coordinator.
#[derive(Clone)]
pub struct CoordinatorHandle {
    events: mpsc::Sender<FormEvent>,
}

#[derive(Debug, Error)]
#[error("coordinator is no longer running")]
pub struct Detached;

impl CoordinatorHandle {
    pub async fn values_changed(&self, values: FieldValues) -> Result<(), Detached> {
        self.events
            .send(FormEvent::ValuesChanged(values))
            .await
            .map_err(|_| Detached)
    }

    pub async fn language_changed(&self, lang: impl Into<String>) -> Result<(), Detached> {
        self.events
            .send(FormEvent::LanguageChanged(lang.into()))
            .await
            .map_err(|_| Detached)
    }
}

/// One validation attempt: a snapshot of input and language, ordered by
/// its token. Never mutated after creation.
struct Round {
    token: u64,
    language: String,
    payload: Value,
}

enum Step {
    Event(FormEvent),
    DebounceElapsed,
    Response(u64, Result<ValidationOutcome>),
}

struct Coordinator<V> {
    cfg: CoordinatorConfig,
    validator: Arc<V>,
    snapshot: FieldValues,
    language: String,
    /// Last applied result, re-shown eagerly while a newer round is pending.
    cache: Vec<ValidationError>,
    /// Highest round token issued so far.
    issued: u64,
    deadline: Option<Instant>,
    errors: watch::Sender<FormErrors>,
    events: mpsc::Receiver<FormEvent>,
    responses: mpsc::Receiver<(u64, Result<ValidationOutcome>)>,
    responses_tx: mpsc::Sender<(u64, Result<ValidationOutcome>)>,
}

/// Attach a coordinator to a form.
///
/// Returns the event handle, a watch receiver carrying the live
/// field-error projection, and the driver task handle. The projection is
/// mutated only by the driver task.
pub fn attach<V: Validate>(
    cfg: CoordinatorConfig,
    validator: V,
    initial_values: FieldValues,
    initial_language: impl Into<String>,
) -> (CoordinatorHandle, watch::Receiver<FormErrors>, JoinHandle<()>) {
    let (events_tx, events_rx) = mpsc::channel(16);
    let (responses_tx, responses_rx) = mpsc::channel(16);

    let mut projection = FormErrors::default();
    projection.sync_fields(initial_values.keys().cloned());
    let (errors_tx, errors_rx) = watch::channel(projection);

    // The initial round goes through the debounce path, like any edit.
    let deadline = Some(Instant::now() + cfg.debounce);

    let coordinator = Coordinator {
        cfg,
        validator: Arc::new(validator),
        snapshot: initial_values,
        language: initial_language.into(),
        cache: Vec::new(),
        issued: 0,
        deadline,
        errors: errors_tx,
        events: events_rx,
        responses: responses_rx,
        responses_tx,
    };
    let task = tokio::spawn(coordinator.run());
    (CoordinatorHandle { events: events_tx }, errors_rx, task)
}

impl<V: Validate> Coordinator<V> {
    async fn run(mut self) {
        loop {
            let step = tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => Step::Event(event),
                    // Every handle dropped: detach.
                    None => break,
                },
                () = debounce_tick(self.deadline) => Step::DebounceElapsed,
                Some((token, outcome)) = self.responses.recv() => Step::Response(token, outcome),
            };
            match step {
                Step::Event(FormEvent::ValuesChanged(values)) => self.on_values_changed(values),
                Step::Event(FormEvent::LanguageChanged(lang)) => self.on_language_changed(lang),
                Step::DebounceElapsed => {
                    self.deadline = None;
                    self.issue_round();
                }
                Step::Response(token, outcome) => self.on_response(token, outcome),
            }
        }
    }

    fn on_values_changed(&mut self, values: FieldValues) {
        // Per-field equality: unchanged snapshots schedule nothing.
        if values == self.snapshot {
            return;
        }
        self.snapshot = values;

        // Keep the previous verdict visible while the new round is pending.
        let snapshot = &self.snapshot;
        let cache = &self.cache;
        self.errors.send_modify(|p| {
            p.sync_fields(snapshot.keys().cloned());
            p.apply(cache);
        });

        self.deadline = Some(Instant::now() + self.cfg.debounce);
    }

    fn on_language_changed(&mut self, language: String) {
        self.language = language;
        // Language switches must reflect immediately: the same input may
        // now need different localized descriptions.
        self.deadline = None;
        self.issue_round();
    }

    fn issue_round(&mut self) {
        self.issued += 1;
        let round = Round {
            token: self.issued,
            language: self.language.clone(),
            payload: match &self.cfg.mapper {
                Some(map) => map(&self.snapshot),
                None => Value::Object(
                    self.snapshot
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                ),
            },
        };
        debug!(token = round.token, lang = %round.language, "issuing validation round");

        let validator = Arc::clone(&self.validator);
        let model = self.cfg.model.clone();
        let tx = self.responses_tx.clone();
        tokio::spawn(async move {
            let outcome = validator
                .validate(&model, &round.payload, &round.language)
                .await;
            let _ = tx.send((round.token, outcome)).await;
        });
    }

    fn on_response(&mut self, token: u64, outcome: Result<ValidationOutcome>) {
        // A newer round supersedes this response; drop it unapplied.
        if token != self.issued {
            debug!(token, issued = self.issued, "dropping superseded validation response");
            return;
        }
        match outcome {
            Ok(ValidationOutcome::Errors(errors)) => {
                self.cache = errors;
                let cache = &self.cache;
                self.errors.send_modify(|p| {
                    p.apply(cache);
                    p.form_error = None;
                });
            }
            Ok(ValidationOutcome::ModelNotFound) => {
                warn!(model = %self.cfg.model, "validation model not registered");
                self.errors
                    .send_modify(|p| p.form_error = Some(MODEL_NOT_FOUND.to_string()));
            }
            Ok(ValidationOutcome::LanguageNotFound) => {
                warn!(lang = %self.language, "validation language not supported");
                self.errors
                    .send_modify(|p| p.form_error = Some(LANGUAGE_NOT_FOUND.to_string()));
            }
            Err(err) => {
                // No verdict: the last known-good result stays on screen.
                warn!(error = %err, "validation round failed");
            }
        }
    }
}

async fn debounce_tick(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
