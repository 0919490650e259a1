//! SQLite storage for holocron
//!
//! A single process-wide connection holds the four tables. Every public
//! operation runs in its own transaction and commits once, so a failed
//! request leaves no partial rows behind.

mod errors;
mod sqlite;

pub use errors::{Entity, StorageError, StorageResult};
pub use sqlite::{FavoriteAdded, SqliteStore};
