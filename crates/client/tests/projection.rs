use formsync_client::projection::FormErrors;
use formsync_core::model::ValidationError;

fn err(field: &str, description: &str) -> ValidationError {
    ValidationError::new(field, description)
}

fn slots(names: &[&str]) -> FormErrors {
    let mut projection = FormErrors::default();
    projection.sync_fields(names.iter().map(|n| n.to_string()));
    projection
}

#[test]
fn applying_the_same_result_twice_is_idempotent() {
    let mut projection = slots(&["username", "age"]);
    let errors = vec![err("age", "must be an integer"), err("age", "must be a number between 18 and 100")];

    projection.apply(&errors);
    let once = projection.clone();
    projection.apply(&errors);

    assert_eq!(projection, once);
    assert_eq!(
        projection.fields["age"].remote,
        vec!["must be an integer", "must be a number between 18 and 100"]
    );
}

#[test]
fn fields_without_errors_are_cleared() {
    let mut projection = slots(&["username", "age"]);
    projection.apply(&[err("username", "too short")]);
    assert_eq!(projection.fields["username"].remote, vec!["too short"]);

    projection.apply(&[err("age", "must be an integer")]);
    assert!(projection.fields["username"].remote.is_empty());
    assert_eq!(projection.fields["age"].remote, vec!["must be an integer"]);
}

#[test]
fn local_validity_state_is_never_clobbered() {
    let mut projection = slots(&["username"]);
    projection.fields.get_mut("username").unwrap().local = vec!["required".to_string()];

    projection.apply(&[err("username", "too short")]);
    projection.apply(&[]);

    let state = &projection.fields["username"];
    assert!(state.remote.is_empty());
    assert_eq!(state.local, vec!["required"]);
    assert!(!state.is_valid());
}

#[test]
fn sync_fields_keeps_surviving_state_and_drops_the_rest() {
    let mut projection = slots(&["username", "age"]);
    projection.apply(&[err("username", "too short"), err("age", "must be an integer")]);

    projection.sync_fields(["username".to_string(), "email".to_string()]);

    assert_eq!(projection.fields["username"].remote, vec!["too short"]);
    assert!(projection.fields["email"].remote.is_empty());
    assert!(!projection.fields.contains_key("age"));
}
