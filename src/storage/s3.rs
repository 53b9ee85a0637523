use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;

use crate::config::S3Config;

use super::{ObjectStore, PutObject, PutReceipt, StorageFault};

/// `ObjectStore` backed by an S3 (or S3-compatible) bucket.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the default AWS provider chain, overridden by
    /// whatever `config` sets explicitly.
    pub async fn connect(config: &S3Config, bucket: impl Into<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(creds) = &config.credentials {
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                None,
                None,
                "formsink-config",
            ));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Self::new(Client::from_conf(s3_config), bucket)
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        "s3"
    }

    async fn put(&self, object: PutObject) -> Result<PutReceipt, StorageFault> {
        let mut req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&object.key)
            .content_type(&object.content_type)
            .body(ByteStream::from(object.body));

        for (k, v) in object.metadata {
            req = req.metadata(k, v);
        }

        let output = req.send().await.map_err(|e| {
            let message = e
                .message()
                .map(|m| m.to_string())
                .unwrap_or_else(|| DisplayErrorContext(&e).to_string());
            StorageFault::from_code(e.code(), message)
        })?;

        Ok(PutReceipt {
            e_tag: output.e_tag().map(|s| s.to_string()),
            version_id: output.version_id().map(|s| s.to_string()),
        })
    }
}
