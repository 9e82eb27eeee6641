use formsync_core::model::ValidationError;
use std::collections::BTreeMap;

/// Error channels for a single field.
///
/// `remote` is owned by the validation coordinator. `local` belongs to
/// whatever synchronous checks the form itself runs; re-projection never
/// writes to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub remote: Vec<String>,
    pub local: Vec<String>,
}

impl FieldState {
    pub fn is_valid(&self) -> bool {
        self.remote.is_empty() && self.local.is_empty()
    }
}

/// The per-field error slots visible to the form layer, plus the
/// form-level slot for non-field failures (unknown model or language).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub fields: BTreeMap<String, FieldState>,
    pub form_error: Option<String>,
}

impl FormErrors {
    /// Reshape the slots to a new field set, keeping the state of fields
    /// that survive.
    pub fn sync_fields(&mut self, names: impl IntoIterator<Item = String>) {
        let mut next = BTreeMap::new();
        for name in names {
            let state = self.fields.remove(&name).unwrap_or_default();
            next.insert(name, state);
        }
        self.fields = next;
    }

    /// Project a validation result onto the remote error slots.
    ///
    /// Fields with no matching entry are cleared; descriptions keep their
    /// result order. Applying the same result twice is a no-op.
    pub fn apply(&mut self, errors: &[ValidationError]) {
        for (name, state) in self.fields.iter_mut() {
            state.remote = errors
                .iter()
                .filter(|e| &e.field == name)
                .map(|e| e.description.clone())
                .collect();
        }
    }
}
