//! CLI command implementations
//!
//! Settings come from defaults, then the optional JSON config file, then
//! command line flags.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::http_server::{HttpServer, ServerConfig};
use crate::observability::init_logging;
use crate::storage::SqliteStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Load configuration from file, or defaults when no file is given
pub fn load_config(path: Option<&Path>) -> CliResult<ServerConfig> {
    let Some(path) = path else {
        return Ok(ServerConfig::default());
    };

    let content = fs::read_to_string(path)
        .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
}

/// Apply command line overrides and validate the result
fn resolve_config(
    path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    database: Option<String>,
) -> CliResult<ServerConfig> {
    let mut config = load_config(path)?;

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(database) = database {
        config.database_path = database;
    }

    config.validate().map_err(CliError::config_error)?;
    Ok(config)
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            host,
            port,
            database,
        } => {
            let config = resolve_config(config.as_deref(), host, port, database)?;
            serve(config)
        }
        Command::InitDb { config, database } => {
            let config = resolve_config(config.as_deref(), None, None, database)?;
            init_db(&config)
        }
    }
}

/// Open the store and serve HTTP until the process stops
pub fn serve(config: ServerConfig) -> CliResult<()> {
    init_logging(&config.log_filter);

    let store = SqliteStore::open(&config.database_path)?;
    tracing::info!(database = %config.database_path, "database opened");

    let server = HttpServer::with_config(config, Arc::new(store));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Create the tables in the configured database
pub fn init_db(config: &ServerConfig) -> CliResult<()> {
    SqliteStore::open(&config.database_path)?;

    write_response(json!({
        "initialized": true,
        "database": config.database_path,
    }))
}
