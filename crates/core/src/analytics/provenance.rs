//! What started a RunSession

use serde_json::Value;

use crate::model::RunSession;

pub const UNKNOWN_SOURCE: &str = "unknown";

/// The session's top-level `source`, or else the provenance kind of its
/// earliest-created request. Requests without a parseable `created` sort last.
pub fn runsession_source(session: &RunSession) -> String {
    match &session.source {
        Some(Value::String(source)) if !source.is_empty() => return source.clone(),
        Some(Value::Null) | Some(Value::String(_)) | None => {}
        Some(other) => return other.to_string(),
    }

    session
        .run_requests
        .iter()
        .filter_map(|request| {
            request
                .provenance()
                .map(|provenance| (request.created_at(), provenance))
        })
        .min_by_key(|(created, _)| (created.is_none(), *created))
        .map(|(_, provenance)| provenance.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}
