//! Observability HTTP Routes
//!
//! Liveness endpoint and the request counter middleware.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Every Nth request is logged by `count_requests`
pub const LOG_EVERY: u64 = 10;

/// Liveness response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create the liveness route at `/`
pub fn liveness_routes() -> Router {
    Router::new().route("/", get(root_handler))
}

async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Server is up!".to_string(),
    })
}

/// Process-wide request counter
#[derive(Debug, Default)]
pub struct RequestCounter {
    count: AtomicU64,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request and return the new total
    pub fn record(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Middleware: count every request, log the total every `LOG_EVERY` requests
pub async fn count_requests(
    State(counter): State<Arc<RequestCounter>>,
    request: Request,
    next: Next,
) -> Response {
    let total = counter.record();
    if total % LOG_EVERY == 0 {
        tracing::info!(total, "Query count: {}", total);
    }
    next.run(request).await
}
