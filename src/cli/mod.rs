//! CLI module for holocron
//!
//! Provides command-line interface for:
//! - serve: Open the database and serve the HTTP API
//! - init-db: Create the database tables and exit

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init_db, load_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};
