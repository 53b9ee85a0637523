use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Value of the `source` field on every record written by this service.
pub const SOURCE: &str = "backend-api";

/// One field of a submission as it arrived.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    /// Absent, `null`, `false`, `0` or `""`.
    #[default]
    Missing,
    Text(String),
    /// Present, but not a string.
    Invalid(Value),
}

impl FieldValue {
    fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => FieldValue::Missing,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => FieldValue::Missing,
            Some(Value::String(s)) if s.is_empty() => FieldValue::Missing,
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(other) => FieldValue::Invalid(other.clone()),
        }
    }

    /// Whether a required field counts as supplied. Blank text does not.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Missing => false,
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Invalid(_) => true,
        }
    }
}

/// Untrusted fields from a decoded request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionInput {
    pub name: FieldValue,
    pub email: FieldValue,
    pub message: FieldValue,
}

impl SubmissionInput {
    /// Pick the known fields out of a decoded body. A body that is not an
    /// object carries no fields at all.
    pub fn from_value(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::default();
        };

        Self {
            name: FieldValue::from_json(obj.get("name")),
            email: FieldValue::from_json(obj.get("email")),
            message: FieldValue::from_json(obj.get("message")),
        }
    }
}

/// A validated submission as persisted to the object store. Built once per
/// request and never modified afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    name: String,
    email: String,
    message: String,
    timestamp: String,
    client_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<String>,
    source: &'static str,
    submission_id: Uuid,
}

impl SubmissionRecord {
    /// Callers must have validated `name` and `email` already.
    pub(crate) fn new(
        name: String,
        email: String,
        message: String,
        timestamp: String,
        client_address: String,
        user_agent: Option<String>,
        submission_id: Uuid,
    ) -> Self {
        Self {
            name,
            email,
            message,
            timestamp,
            client_address,
            user_agent,
            source: SOURCE,
            submission_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn client_address(&self) -> &str {
        &self.client_address
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn source(&self) -> &str {
        self.source
    }

    pub fn submission_id(&self) -> Uuid {
        self.submission_id
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}
