//! # HTTP Server Module
//!
//! Axum server exposing the student store.
//!
//! # Endpoints
//!
//! - `GET /` - Liveness message
//! - `GET /students?name=&age=&school=` - List with exact-match filters
//! - `POST /students/` - Create
//! - `GET|PUT|DELETE /students/{id}` - Read, replace, delete one record

pub mod config;
pub mod errors;
pub mod observability_routes;
pub mod server;
pub mod student_routes;

pub use config::HttpServerConfig;
pub use errors::ErrorResponse;
pub use observability_routes::{MessageResponse, RequestCounter, LOG_EVERY};
pub use server::{shutdown_signal, HttpServer};
