use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{FieldValue, SubmissionInput, SubmissionRecord};

use super::metadata::ClientMetadata;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Name and email are required fields";

/// Fresh id for one submission: a millisecond timestamp followed by random
/// bits, so ids from separate processes don't collide either.
pub fn new_submission_id() -> Uuid {
    Uuid::now_v7()
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2025-03-01T10:20:30.123Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Validate the input and build the record. Presence is checked before
/// type, so a missing field wins over a malformed one.
pub fn build(
    input: SubmissionInput,
    meta: ClientMetadata,
    submitted_at: DateTime<Utc>,
) -> Result<SubmissionRecord, AppError> {
    if !input.name.is_present() || !input.email.is_present() {
        return Err(AppError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
    }

    let name = text("name", input.name)?;
    let email = text("email", input.email)?;
    let message = text("message", input.message)?;

    Ok(SubmissionRecord::new(
        name,
        email,
        message,
        iso_timestamp(submitted_at),
        meta.client_address,
        meta.user_agent,
        new_submission_id(),
    ))
}

/// Trimmed text of a field; missing fields are empty.
fn text(key: &str, value: FieldValue) -> Result<String, AppError> {
    match value {
        FieldValue::Missing => Ok(String::new()),
        FieldValue::Text(s) => Ok(s.trim().to_string()),
        FieldValue::Invalid(other) => Err(AppError::Construction(format!(
            "Field '{key}' must be a string, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn meta() -> ClientMetadata {
        ClientMetadata {
            client_address: "127.0.0.1".to_string(),
            user_agent: None,
        }
    }

    fn build_from(raw: serde_json::Value) -> Result<SubmissionRecord, AppError> {
        build(SubmissionInput::from_value(&raw), meta(), Utc::now())
    }

    #[test]
    fn missing_email_beats_malformed_name() {
        let err = build_from(json!({ "name": 42 })).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }

    #[test]
    fn malformed_present_field_fails_construction() {
        let err = build_from(json!({ "name": ["Al"], "email": "a@x.com" })).unwrap_err();
        assert!(matches!(err, AppError::Construction(_)), "{err}");
    }

    #[test]
    fn falsy_message_is_stored_empty() {
        for message in [json!(false), json!(0), json!(""), json!(null)] {
            let record =
                build_from(json!({ "name": "Al", "email": "a@x.com", "message": message }))
                    .unwrap();
            assert_eq!(record.message(), "");
        }
    }
}
