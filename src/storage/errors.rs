//! # Storage Errors
//!
//! Error types for the SQLite store.

use std::fmt;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Kinds of records a lookup can miss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Planet,
    Character,
    FavoritePlanet,
    FavoriteCharacter,
}

impl Entity {
    /// Human readable name, as it appears in `"<name> not found"`
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::User => "User",
            Entity::Planet => "Planet",
            Entity::Character => "Character",
            Entity::FavoritePlanet => "Favorite planet",
            Entity::FavoriteCharacter => "Favorite character",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// A referenced record does not exist
    #[error("{0} not found")]
    NotFound(Entity),

    /// SQLite rejected the statement (constraint violation, I/O, ...)
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A previous holder of the connection panicked
    #[error("Storage connection lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// True for explicit "not found" outcomes
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}
