//! CLI module for studentdb
//!
//! Provides command-line interface for:
//! - serve: Load the store and serve the HTTP API
//! - check: Load the persistence file and print a summary

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, StoreArgs};
pub use commands::{
    check, check_to, init_logging, run, run_command, serve, shutdown_store, Config, PersistMode,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};
