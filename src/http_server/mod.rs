//! # holocron HTTP Server Module
//!
//! Every route maps to one store operation.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/post-new-*`, `/get-all-*`, `/get-*-by-id/{id}` - Users, planets, characters
//! - `/get-user-favorites/{user_id}` - A user's favorites
//! - `/add-favorite-*`, `/delete-favorite-*` - Favorite management

pub mod config;
pub mod entity_routes;
pub mod errors;
pub mod favorite_routes;
pub mod observability_routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{build_router, HttpServer};
pub use state::SharedStore;
