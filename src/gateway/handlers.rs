use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use tracing::{debug, error};

use super::GatewayState;
use crate::events::{EventRecord, Partition};
use crate::store::EventStore;

/// Structured error body, `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn store_read(partition: Partition) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: partition.read_error_message().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

pub async fn list_logs<S: EventStore>(
    State(state): State<GatewayState<S>>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    read_partition(&state, Partition::Log).await
}

pub async fn list_verified<S: EventStore>(
    State(state): State<GatewayState<S>>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    read_partition(&state, Partition::Verified).await
}

async fn read_partition<S: EventStore>(
    state: &GatewayState<S>,
    partition: Partition,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    match state.snapshot(partition).await {
        Ok(records) => {
            debug!("Serving {} {} records", records.len(), partition);
            Ok(Json(records))
        }
        Err(e) => {
            error!("Error reading {}: {}", partition, e);
            Err(ApiError::store_read(partition))
        }
    }
}

pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "nfc-dashboard",
        "timestamp": chrono::Utc::now()
    }))
}
