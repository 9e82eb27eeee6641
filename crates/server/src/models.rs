use formsync_core::registry::{ModelSpec, Registry, RegistryError};
use formsync_core::rules;

/// Topics a user may declare an interest in.
pub const TOPICS: &[&str] = &["coding", "gaming", "music", "sports", "cooking"];

/// Declare every model the server validates. Called once at startup;
/// the registry is read-only afterwards.
pub fn register_models(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        ModelSpec::new("user")
            .multiple_errors(true)
            .field(
                "username",
                vec![rules::alphanumeric(), rules::min_max_len(10, 30)],
            )
            .field("email", vec![rules::email()])
            .field(
                "age",
                vec![rules::integer(), rules::min_max_number(18, 100)],
            )
            .field(
                "interests",
                vec![
                    rules::array(),
                    rules::array_min_size(1),
                    rules::one_of(TOPICS),
                ],
            ),
    )
}
