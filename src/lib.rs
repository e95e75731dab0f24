//! studentdb - student records over HTTP, persisted to a JSON file
//!
//! - `store`: the in-memory record store and its persistence file
//! - `http_server`: axum routes over the store
//! - `cli`: command-line entry points

pub mod cli;
pub mod http_server;
pub mod store;
