//! Record types for holocron
//!
//! Four tables back the service:
//!
//! - `user`: account with a unique email, owns favorites
//! - `planet`: unique name, climate, terrain
//! - `character`: unique name, height, weight, gender
//! - `favorite`: one user, an optional planet, an optional character
//!
//! Records are created once and never updated. Only favorites are deleted.

mod types;

pub use types::{
    Character, Favorite, FavoriteTarget, NewCharacter, NewPlanet, NewUser, Planet, RecordId, User,
    SUBSCRIPTION_DATE_FORMAT,
};
