use anyhow::Result;
use formsync_core::model::ValidationOutcome;
use serde_json::Value;
use std::future::Future;

/// A remote validator the coordinator can ask for a verdict.
///
/// `Err` means no verdict was available (transport failure); the
/// coordinator keeps the last applied result visible in that case.
pub trait Validate: Send + Sync + 'static {
    fn validate(
        &self,
        model: &str,
        value: &Value,
        lang: &str,
    ) -> impl Future<Output = Result<ValidationOutcome>> + Send;
}
