//! CLI argument definitions using clap
//!
//! Commands:
//! - holocron serve [--config <path>] [--host H] [--port P] [--database PATH]
//! - holocron init-db [--config <path>] [--database PATH]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// holocron - Star Wars users, planets, characters and favorites over HTTP
#[derive(Parser, Debug)]
#[command(name = "holocron")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the database and serve the HTTP API
    Serve {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long)]
        database: Option<String>,
    },

    /// Create the database tables and exit
    InitDb {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// SQLite database file
        #[arg(long)]
        database: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
