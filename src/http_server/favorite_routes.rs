//! Favorite HTTP Routes
//!
//! List, add and remove a user's favorite planets and characters.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;

use crate::schema::{Favorite, FavoriteTarget, RecordId};

use super::errors::ApiResult;
use super::state::{with_store, SharedStore};

/// Confirmation body for favorite changes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create favorite routes
pub fn favorite_routes(store: SharedStore) -> Router {
    Router::new()
        .route("/get-user-favorites/:user_id", get(user_favorites_handler))
        .route(
            "/add-favorite-planet/:user_id/:planet_id",
            post(add_favorite_planet_handler),
        )
        .route(
            "/add-favorite-character/:user_id/:character_id",
            post(add_favorite_character_handler),
        )
        .route(
            "/delete-favorite-planet/:user_id/:planet_id",
            delete(delete_favorite_planet_handler),
        )
        .route(
            "/delete-favorite-character/:user_id/:character_id",
            delete(delete_favorite_character_handler),
        )
        .with_state(store)
}

async fn user_favorites_handler(
    State(store): State<SharedStore>,
    path: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<Vec<Favorite>>> {
    let Path(user_id) = path?;
    let favorites = with_store(&store, move |s| s.user_favorites(user_id)).await?;
    Ok(Json(favorites))
}

async fn add_favorite_planet_handler(
    State(store): State<SharedStore>,
    path: Result<Path<(RecordId, RecordId)>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path((user_id, planet_id)) = path?;
    add_favorite(store, user_id, FavoriteTarget::Planet(planet_id)).await
}

async fn add_favorite_character_handler(
    State(store): State<SharedStore>,
    path: Result<Path<(RecordId, RecordId)>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path((user_id, character_id)) = path?;
    add_favorite(store, user_id, FavoriteTarget::Character(character_id)).await
}

async fn delete_favorite_planet_handler(
    State(store): State<SharedStore>,
    path: Result<Path<(RecordId, RecordId)>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path((user_id, planet_id)) = path?;
    remove_favorite(store, user_id, FavoriteTarget::Planet(planet_id)).await
}

async fn delete_favorite_character_handler(
    State(store): State<SharedStore>,
    path: Result<Path<(RecordId, RecordId)>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path((user_id, character_id)) = path?;
    remove_favorite(store, user_id, FavoriteTarget::Character(character_id)).await
}

async fn add_favorite(
    store: SharedStore,
    user_id: RecordId,
    target: FavoriteTarget,
) -> ApiResult<Json<MessageResponse>> {
    let added = with_store(&store, move |s| s.add_favorite(user_id, target)).await?;
    tracing::debug!(
        user_id,
        target_id = target.id(),
        favorite_id = added.favorite_id,
        kind = target.label(),
        "favorite added"
    );

    Ok(Json(MessageResponse {
        message: format!(
            "{} {} added to favorites for user {}",
            target.label(),
            added.target_name,
            added.user_first_name
        ),
    }))
}

async fn remove_favorite(
    store: SharedStore,
    user_id: RecordId,
    target: FavoriteTarget,
) -> ApiResult<Json<MessageResponse>> {
    let favorite_id = with_store(&store, move |s| s.remove_favorite(user_id, target)).await?;
    tracing::debug!(user_id, favorite_id, kind = target.label(), "favorite removed");

    Ok(Json(MessageResponse {
        message: format!("Favorite {} deleted", target.label().to_lowercase()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_serialization() {
        let response = MessageResponse {
            message: "Favorite planet deleted".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Favorite planet deleted"}));
    }
}
