//! Client-side validation coordination: observe form edits, debounce,
//! issue validation rounds against the server and project the results
//! onto per-field error slots without ever regressing to a stale verdict.

pub mod coordinator;
pub mod http;
pub mod projection;
pub mod validate;

pub use coordinator::{attach, CoordinatorConfig, CoordinatorHandle, Detached, FieldValues};
pub use http::HttpValidator;
pub use projection::{FieldState, FormErrors};
pub use validate::Validate;
