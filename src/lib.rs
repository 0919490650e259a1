//! holocron - users, planets, characters and their favorites over HTTP/JSON
//!
//! Each route performs one lookup or one single-table write against SQLite
//! and returns the serialized record.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod storage;
