use std::net::{IpAddr, SocketAddr};

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

pub const SUCCESS_MESSAGE: &str = "Form submitted successfully and saved to S3!";

pub async fn submit_form(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    // Oversized or truncated bodies land on the generic boundary response.
    let body = body.map_err(|e| AppError::Internal(format!("Failed to read form body: {e}")))?;

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let raw_data = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parser::parse_multipart(&headers, body).await
    } else {
        parser::parse_body(content_type, &body)
    }
    .map_err(|e| AppError::Internal(format!("Unreadable form body: {e}")))?;

    tracing::debug!("Received form submission: {raw_data}");

    let peer_ip: Option<IpAddr> = Some(addr.ip());
    let result = pipeline::run(&state, &headers, peer_ip, raw_data).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": SUCCESS_MESSAGE,
            "fileName": result.file_name,
            "submissionId": result.submission_id,
            "timestamp": result.timestamp,
        })),
    )
        .into_response())
}
