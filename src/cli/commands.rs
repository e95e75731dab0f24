//! CLI command implementations
//!
//! `serve` boots in a fixed order: logging, config, store, HTTP server.
//! Shutdown runs it backwards: stop serving, drain queued saves, then one
//! final persist.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use crate::http_server::{shutdown_signal, HttpServer, HttpServerConfig};
use crate::store::{load_students, BackgroundPersist, PersistHook, StudentStore, SyncPersist, WriteMode};

use super::args::{Cli, Command, StoreArgs};
use super::errors::{CliError, CliResult};
use super::io::write_response_to;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./studentdb.json";

/// When saves happen after a mutation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistMode {
    /// Queue the snapshot for a background writer
    #[default]
    Background,
    /// Write before the request returns; trades throughput for durability
    Sync,
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Persistence file (default: students.json)
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// How saves reach the disk (default: overwrite)
    #[serde(default)]
    pub write_mode: WriteMode,

    /// When saves happen (default: background)
    #[serde(default)]
    pub persist: PersistMode,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("students.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            write_mode: WriteMode::default(),
            persist: PersistMode::default(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Resolve the config for a command
    ///
    /// An explicit `--config` must load. Otherwise the default path is used
    /// when it exists, and built-in defaults when it does not.
    pub fn resolve(args: &StoreArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        if let Some(db_path) = &args.db_path {
            config.db_path = db_path.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(CliError::config_error("db_path must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        Ok(())
    }
}

/// Run the CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a specific command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { store, host, port } => {
            init_logging();

            let mut config = Config::resolve(&store)?;
            if let Some(host) = host {
                config.http.host = host;
            }
            if let Some(port) = port {
                config.http.port = port;
            }
            config.validate()?;

            serve(config)
        }
        Command::Check { store } => {
            let config = Config::resolve(&store)?;
            check(&config)
        }
    }
}

/// Install the tracing subscriber (`RUST_LOG`, default `info,studentdb=debug`)
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,studentdb=debug"));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}

/// Serve the HTTP API until Ctrl+C
pub fn serve(config: Config) -> CliResult<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(async move {
        tracing::info!(
            db_path = %config.db_path.display(),
            write_mode = ?config.write_mode,
            persist = ?config.persist,
            "starting studentdb v{}",
            env!("CARGO_PKG_VERSION")
        );

        let (hook, background): (Arc<dyn PersistHook>, Option<Arc<BackgroundPersist>>) =
            match config.persist {
                PersistMode::Background => {
                    let bg = Arc::new(BackgroundPersist::spawn(&config.db_path, config.write_mode));
                    (bg.clone() as Arc<dyn PersistHook>, Some(bg))
                }
                PersistMode::Sync => {
                    let sync = SyncPersist::new(&config.db_path, config.write_mode);
                    (Arc::new(sync) as Arc<dyn PersistHook>, None)
                }
            };

        let store = Arc::new(StudentStore::open(&config.db_path, config.write_mode, hook)?);

        let served = HttpServer::new(config.http.clone(), store.clone())
            .start_with_shutdown(shutdown_signal())
            .await;

        shutdown_store(&store, background.as_deref()).await;

        served.map_err(|e| CliError::server_failed(e.to_string()))?;
        tracing::info!("server stopped");
        Ok::<(), CliError>(())
    })
}

/// Flush the store once the server has stopped
///
/// Queued background saves are drained first so none of them can land after
/// the final persist and overwrite it with an older snapshot. The final save
/// is best-effort: a failure is logged, not retried.
pub async fn shutdown_store(store: &StudentStore, background: Option<&BackgroundPersist>) {
    if let Some(background) = background {
        background.shutdown().await;
    }

    match store.persist() {
        Ok(()) => tracing::info!(records = store.len(), "final persist complete"),
        Err(e) => tracing::error!(error = %e, "final persist failed"),
    }
}

/// Load the persistence file and print a summary
pub fn check(config: &Config) -> CliResult<()> {
    let stdout = io::stdout();
    check_to(config, &mut stdout.lock())
}

/// Load the persistence file and write a summary to `writer`
pub fn check_to<W: Write>(config: &Config, writer: &mut W) -> CliResult<()> {
    let students = load_students(&config.db_path)?;

    write_response_to(
        writer,
        json!({
            "path": config.db_path.display().to_string(),
            "records": students.len(),
        }),
    )
}
