//! Submission handling.
//!
//! A successful submit hands the payload to a handler supplied by the
//! hosting application. Nothing is persisted or sent anywhere by this crate.

use tracing::info;

use crate::Payload;
use crate::redact::value_logging_enabled;

pub trait SubmissionHandler {
    fn handle(&mut self, document_id: &str, payload: &Payload);
}

impl<F> SubmissionHandler for F
where
    F: FnMut(&str, &Payload),
{
    fn handle(&mut self, document_id: &str, payload: &Payload) {
        self(document_id, payload)
    }
}

/// Logs the submission; the payload body is only logged when value logging
/// is enabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSubmission;

impl SubmissionHandler for LogSubmission {
    fn handle(&mut self, document_id: &str, payload: &Payload) {
        if value_logging_enabled() {
            let body = payload
                .to_json_pretty()
                .unwrap_or_else(|error| format!("<unserializable payload: {error}>"));
            info!(document = document_id, payload = %body, "document submitted");
        } else {
            info!(document = document_id, keys = payload.len(), "document submitted");
        }
    }
}
