use crate::rules::Rule;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("model '{0}' is already registered")]
    DuplicateModel(String),
}

/// One named field with its ordered rule list.
pub struct FieldSpec {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// A validatable model: display name, multiplicity flag and ordered
/// field declarations.
pub struct ModelSpec {
    pub display_name: String,
    /// When set, every failing rule of a field is reported; otherwise
    /// only the first failure per field.
    pub multiple_errors_per_field: bool,
    pub fields: Vec<FieldSpec>,
}

impl ModelSpec {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            multiple_errors_per_field: false,
            fields: Vec::new(),
        }
    }

    pub fn multiple_errors(mut self, enabled: bool) -> Self {
        self.multiple_errors_per_field = enabled;
        self
    }

    pub fn field(mut self, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            rules,
        });
        self
    }

    /// Languages this model's rule declarations carry descriptions for.
    pub fn supported_languages(&self) -> BTreeSet<&str> {
        self.fields
            .iter()
            .flat_map(|f| f.rules.iter())
            .flat_map(|r| r.languages())
            .collect()
    }
}

/// Startup-populated mapping from model display name to its declaration.
/// Read-only once the process is serving requests.
#[derive(Default)]
pub struct Registry {
    models: BTreeMap<String, ModelSpec>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: ModelSpec) -> Result<(), RegistryError> {
        if self.models.contains_key(&spec.display_name) {
            return Err(RegistryError::DuplicateModel(spec.display_name));
        }
        self.models.insert(spec.display_name.clone(), spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ModelSpec> {
        self.models.get(name)
    }
}
