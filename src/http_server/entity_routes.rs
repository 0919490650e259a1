//! Entity HTTP Routes
//!
//! Create, list and look up users, planets and characters.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::schema::{Character, NewCharacter, NewPlanet, NewUser, Planet, RecordId, User};

use super::errors::ApiResult;
use super::state::{with_store, SharedStore};

/// Create entity routes
pub fn entity_routes(store: SharedStore) -> Router {
    Router::new()
        // Users
        .route("/post-new-user", post(create_user_handler))
        .route("/get-all-users", get(list_users_handler))
        // Planets
        .route("/post-new-planet", post(create_planet_handler))
        .route("/get-all-planets", get(list_planets_handler))
        .route("/get-planet-by-id/:planet_id", get(get_planet_handler))
        // Characters
        .route("/post-new-character", post(create_character_handler))
        .route("/get-all-characters", get(list_characters_handler))
        .route("/get-character-by-id/:character_id", get(get_character_handler))
        .with_state(store)
}

// ==================
// User Handlers
// ==================

async fn create_user_handler(
    State(store): State<SharedStore>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(new_user) = payload?;
    let user = with_store(&store, move |s| s.create_user(&new_user)).await?;
    tracing::debug!(user_id = user.id, email = %user.email, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users_handler(State(store): State<SharedStore>) -> ApiResult<Json<Vec<User>>> {
    let users = with_store(&store, |s| s.list_users()).await?;
    Ok(Json(users))
}

// ==================
// Planet Handlers
// ==================

async fn create_planet_handler(
    State(store): State<SharedStore>,
    payload: Result<Json<NewPlanet>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Planet>)> {
    let Json(new_planet) = payload?;
    let planet = with_store(&store, move |s| s.create_planet(&new_planet)).await?;
    tracing::debug!(planet_id = planet.id, name = %planet.name, "planet created");
    Ok((StatusCode::CREATED, Json(planet)))
}

async fn list_planets_handler(State(store): State<SharedStore>) -> ApiResult<Json<Vec<Planet>>> {
    let planets = with_store(&store, |s| s.list_planets()).await?;
    Ok(Json(planets))
}

async fn get_planet_handler(
    State(store): State<SharedStore>,
    path: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<Planet>> {
    let Path(planet_id) = path?;
    let planet = with_store(&store, move |s| s.get_planet(planet_id)).await?;
    Ok(Json(planet))
}

// ==================
// Character Handlers
// ==================

async fn create_character_handler(
    State(store): State<SharedStore>,
    payload: Result<Json<NewCharacter>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Character>)> {
    let Json(new_character) = payload?;
    let character = with_store(&store, move |s| s.create_character(&new_character)).await?;
    tracing::debug!(character_id = character.id, name = %character.name, "character created");
    Ok((StatusCode::CREATED, Json(character)))
}

async fn list_characters_handler(
    State(store): State<SharedStore>,
) -> ApiResult<Json<Vec<Character>>> {
    let characters = with_store(&store, |s| s.list_characters()).await?;
    Ok(Json(characters))
}

async fn get_character_handler(
    State(store): State<SharedStore>,
    path: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<Character>> {
    let Path(character_id) = path?;
    let character = with_store(&store, move |s| s.get_character(character_id)).await?;
    Ok(Json(character))
}
