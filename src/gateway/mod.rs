//! Log Store Gateway
//!
//! Read-only HTTP surface over the event store. Each endpoint returns the most
//! recent records of one partition, ascending by timestamp.

pub mod handlers;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{DashboardError, Result};
use crate::events::{EventRecord, Partition};
use crate::store::EventStore;

pub use handlers::ApiError;

/// Shared, read-only request state
pub struct GatewayState<S> {
    store: Arc<S>,
    record_limit: usize,
}

impl<S> Clone for GatewayState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            record_limit: self.record_limit,
        }
    }
}

impl<S: EventStore> GatewayState<S> {
    pub fn new(store: S, record_limit: usize) -> Self {
        Self {
            store: Arc::new(store),
            record_limit: record_limit.max(1),
        }
    }

    /// Most recent records of `partition`, reshaped for the wire
    pub async fn snapshot(&self, partition: Partition) -> Result<Vec<EventRecord>> {
        let raw = self.store.read_latest(partition, self.record_limit).await?;
        Ok(EventRecord::reshape(raw, self.record_limit))
    }
}

/// API routes without middleware
pub fn router<S: EventStore>(state: GatewayState<S>) -> Router {
    Router::new()
        .route("/api/logs", get(handlers::list_logs::<S>))
        .route("/api/verified", get(handlers::list_verified::<S>))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

/// API routes with request tracing and CORS for the dashboard origin
pub fn app<S: EventStore>(state: GatewayState<S>, cors_origin: &str) -> Result<Router> {
    Ok(router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors_origin)?)
            .into_inner(),
    ))
}

/// CORS for read-only access from `origin`; `*` allows any origin
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        let value = HeaderValue::from_str(origin.trim()).map_err(|e| {
            DashboardError::ConfigError(format!("Invalid CORS origin {}: {}", origin, e))
        })?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60)))
}
