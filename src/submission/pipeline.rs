use std::collections::BTreeMap;
use std::net::IpAddr;

use axum::http::HeaderMap;
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::SubmissionInput;
use crate::state::SharedState;
use crate::storage::{PutObject, StorageFault};

use super::key;
use super::metadata;
use super::record;

pub struct PipelineResult {
    pub file_name: String,
    pub submission_id: Uuid,
    pub timestamp: String,
}

pub async fn run(
    state: &SharedState,
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    raw_data: serde_json::Value,
) -> Result<PipelineResult, AppError> {
    let input = SubmissionInput::from_value(&raw_data);

    let meta = metadata::extract(headers, peer_addr, &state.config.trusted_proxies);
    let submission = record::build(input, meta, Utc::now())?;

    let file_name = key::storage_key(submission.timestamp(), submission.submission_id());

    let body = submission
        .to_json_pretty()
        .map_err(|e| AppError::Construction(format!("Failed to serialize submission: {e}")))?;

    let object = PutObject {
        key: file_name.clone(),
        body,
        content_type: "application/json".to_string(),
        metadata: BTreeMap::from([
            ("submitted-by".to_string(), submission.email().to_string()),
            (
                "submission-date".to_string(),
                submission.timestamp().to_string(),
            ),
        ]),
    };

    let put = state.store.put(object);
    let receipt = match state.config.storage_timeout {
        Some(limit) => tokio::time::timeout(limit, put).await.map_err(|_| {
            StorageFault::Other {
                code: None,
                message: format!("Storage put timed out after {limit:?}"),
            }
        })?,
        None => put.await,
    }?;

    tracing::info!(
        key = %file_name,
        store = state.store.name(),
        e_tag = receipt.e_tag.as_deref().unwrap_or("-"),
        version_id = receipt.version_id.as_deref().unwrap_or("-"),
        "Form data saved"
    );

    Ok(PipelineResult {
        file_name,
        submission_id: submission.submission_id(),
        timestamp: submission.timestamp().to_string(),
    })
}
