//! # HTTP Server
//!
//! Main HTTP server combining the liveness and student routers.

use std::future::Future;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::config::HttpServerConfig;
use super::observability_routes::{count_requests, liveness_routes, RequestCounter};
use super::student_routes::{student_routes, StudentState};
use crate::store::StudentStore;

/// HTTP Server for the student store
pub struct HttpServer {
    config: HttpServerConfig,
    counter: Arc<RequestCounter>,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over an opened store
    pub fn new(config: HttpServerConfig, store: Arc<StudentStore>) -> Self {
        let counter = Arc::new(RequestCounter::new());
        let router = Self::build_router(&config, store, counter.clone());
        Self {
            config,
            counter,
            router,
        }
    }

    /// Build the combined router with all endpoints
    fn build_router(
        config: &HttpServerConfig,
        store: Arc<StudentStore>,
        counter: Arc<RequestCounter>,
    ) -> Router {
        let student_state = Arc::new(StudentState::new(store));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(liveness_routes())
            .merge(student_routes(student_state))
            .layer(middleware::from_fn_with_state(counter, count_requests))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Requests seen so far
    pub fn request_counter(&self) -> Arc<RequestCounter> {
        self.counter.clone()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves, then finish in-flight requests
    pub async fn start_with_shutdown<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let addr = listener.local_addr()?;

        tracing::info!(%addr, "student server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Resolves on Ctrl+C
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
        Err(e) => tracing::error!(error = %e, "failed to listen for Ctrl+C"),
    }
}
