use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::state::SharedState;
use crate::submission::record::iso_timestamp;

pub async fn health(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "timestamp": iso_timestamp(Utc::now()),
        "bucket": state.config.bucket,
    }))
}
