use serde_json::Value;
use super::Operation;

/// Human readable diagnostic for a failed Core call.
///
/// The Core's own `errorMessage` is appended when the body carries one.
pub fn describe_failure(status: u16, operation: Operation, payload: &Value) -> String {
    let system = operation.core_system();
    let summary = match status {
        400 => format!("Unable to {}.", operation),
        401 => format!(
            "Client is not authorized for communication with the {}.",
            system
        ),
        500 => format!("Core service {} is not available.", system),
        _ => format!(
            "Unknown error with code {} when trying to {} with the {}.",
            status, operation, system
        ),
    };

    match server_reason(payload) {
        Some(reason) => format!("{} Reason: {}", summary, reason),
        None => summary,
    }
}

fn server_reason(payload: &Value) -> Option<&str> {
    let reason = match payload {
        Value::Object(fields) => ["errorMessage", "error", "message"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str)),
        Value::String(text) => Some(text.as_str()),
        _ => None,
    }?;

    let reason = reason.trim();
    (!reason.is_empty()).then_some(reason)
}
