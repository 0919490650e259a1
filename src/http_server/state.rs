//! Shared handler state

use std::sync::Arc;

use crate::storage::{SqliteStore, StorageResult};

use super::errors::{ApiError, ApiResult};

/// Store handle shared across handlers
pub type SharedStore = Arc<SqliteStore>;

/// Run a store operation on the blocking pool.
///
/// SQLite calls block, so they stay off the async workers.
pub async fn with_store<T, F>(store: &SharedStore, op: F) -> ApiResult<T>
where
    F: FnOnce(&SqliteStore) -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(&*store))
        .await
        .map_err(|e| ApiError::Storage(format!("storage task failed: {}", e)))?
        .map_err(ApiError::from)
}
