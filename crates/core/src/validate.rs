use crate::model::{ValidationError, ValidationOutcome};
use crate::registry::Registry;
use crate::rules::DEFAULT_LANG;
use serde_json::Value;

/// Run a model's declared rules against a candidate value.
///
/// Pure function of its three inputs plus the read-only registry, so it
/// is safe to call concurrently from any number of requests.
pub fn validate_model(
    registry: &Registry,
    model: &str,
    value: &Value,
    lang: &str,
) -> ValidationOutcome {
    let Some(spec) = registry.get(model) else {
        return ValidationOutcome::ModelNotFound;
    };

    // The empty tag always resolves to the default language.
    if lang != DEFAULT_LANG && !spec.supported_languages().contains(lang) {
        return ValidationOutcome::LanguageNotFound;
    }

    let mut errors = Vec::new();
    for field in &spec.fields {
        let candidate = value.get(&field.name).unwrap_or(&Value::Null);
        for rule in &field.rules {
            if rule.check(candidate) {
                continue;
            }
            errors.push(ValidationError::new(
                field.name.clone(),
                rule.description(lang),
            ));
            if !spec.multiple_errors_per_field {
                break;
            }
        }
    }
    ValidationOutcome::Errors(errors)
}
