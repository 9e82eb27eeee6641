//! Shared models, rule engine and validation dispatch for the formsync
//! server and clients.

pub mod model;
pub mod registry;
pub mod rules;
pub mod validate;

pub use model::*;
pub use registry::*;
pub use rules::Rule;
pub use validate::validate_model;
