//! CLI argument definitions using clap
//!
//! Commands:
//! - studentdb serve [--config <path>] [--db-path <path>] [--host <host>] [--port <port>]
//! - studentdb check [--config <path>] [--db-path <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// studentdb - student records over HTTP, persisted to a JSON file
#[derive(Parser, Debug)]
#[command(name = "studentdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Path to configuration file (default: ./studentdb.json if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Persistence file, overrides `db_path` from the config file
    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the store and serve the HTTP API until Ctrl+C
    Serve {
        #[command(flatten)]
        store: StoreArgs,

        /// Host to bind, overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load the persistence file and print a summary
    Check {
        #[command(flatten)]
        store: StoreArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides_parse() {
        let cli = Cli::try_parse_from([
            "studentdb",
            "serve",
            "--db-path",
            "/tmp/s.json",
            "--port",
            "9000",
        ])
        .unwrap();

        match cli.command {
            Command::Serve { store, host, port } => {
                assert_eq!(store.db_path, Some(PathBuf::from("/tmp/s.json")));
                assert_eq!(store.config, None);
                assert_eq!(host, None);
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_parses() {
        let cli = Cli::try_parse_from(["studentdb", "check", "--config", "c.json"]).unwrap();
        assert!(matches!(cli.command, Command::Check { .. }));
    }
}
