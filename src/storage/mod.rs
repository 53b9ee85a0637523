pub mod memory;
pub mod s3;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use s3::S3Store;

/// A single object write.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutReceipt {
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
}

/// Why a put failed, independent of which provider served it.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageFault {
    BucketNotFound,
    AccessDenied,
    InvalidAccessKey,
    SignatureMismatch,
    Other {
        code: Option<String>,
        message: String,
    },
}

impl StorageFault {
    /// Translate an S3 protocol error code. Codes outside the four we
    /// distinguish are kept verbatim in `Other`.
    pub fn from_code(code: Option<&str>, message: impl Into<String>) -> Self {
        match code {
            Some("NoSuchBucket") => StorageFault::BucketNotFound,
            Some("AccessDenied") => StorageFault::AccessDenied,
            Some("InvalidAccessKeyId") => StorageFault::InvalidAccessKey,
            Some("SignatureDoesNotMatch") => StorageFault::SignatureMismatch,
            other => StorageFault::Other {
                code: other.map(|c| c.to_string()),
                message: message.into(),
            },
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            StorageFault::BucketNotFound => Some("NoSuchBucket"),
            StorageFault::AccessDenied => Some("AccessDenied"),
            StorageFault::InvalidAccessKey => Some("InvalidAccessKeyId"),
            StorageFault::SignatureMismatch => Some("SignatureDoesNotMatch"),
            StorageFault::Other { code, .. } => code.as_deref(),
        }
    }
}

impl std::fmt::Display for StorageFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageFault::BucketNotFound => write!(f, "bucket not found"),
            StorageFault::AccessDenied => write!(f, "access denied"),
            StorageFault::InvalidAccessKey => write!(f, "invalid access key id"),
            StorageFault::SignatureMismatch => write!(f, "signature does not match"),
            StorageFault::Other {
                code: Some(code),
                message,
            } => write!(f, "{code}: {message}"),
            StorageFault::Other { code: None, message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for StorageFault {}

/// Write side of an object store. Implementations must be safe to share
/// across concurrent requests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &str;
    async fn put(&self, object: PutObject) -> Result<PutReceipt, StorageFault>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_translate_to_named_faults() {
        assert_eq!(
            StorageFault::from_code(Some("NoSuchBucket"), "x"),
            StorageFault::BucketNotFound
        );
        assert_eq!(
            StorageFault::from_code(Some("AccessDenied"), "x"),
            StorageFault::AccessDenied
        );
        assert_eq!(
            StorageFault::from_code(Some("InvalidAccessKeyId"), "x"),
            StorageFault::InvalidAccessKey
        );
        assert_eq!(
            StorageFault::from_code(Some("SignatureDoesNotMatch"), "x"),
            StorageFault::SignatureMismatch
        );
    }

    #[test]
    fn unknown_codes_are_kept() {
        let fault = StorageFault::from_code(Some("SlowDown"), "reduce your request rate");
        assert_eq!(fault.code(), Some("SlowDown"));

        let fault = StorageFault::from_code(None, "dispatch failure");
        assert_eq!(fault.code(), None);
        assert_eq!(fault.to_string(), "dispatch failure");
    }
}
