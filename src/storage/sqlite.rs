//! SQLite backend
//!
//! Thread-safe via internal Mutex (SQLite Connection is not Sync).

use std::path::Path;
use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::schema::{
    Character, Favorite, FavoriteTarget, NewCharacter, NewPlanet, NewUser, Planet, RecordId, User,
};

use super::errors::{Entity, StorageError, StorageResult};

/// Table definitions, applied on every open.
///
/// `user` and `character` are always written quoted.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "user" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    subscription_date DATETIME NOT NULL
);
CREATE TABLE IF NOT EXISTS planet (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    climate TEXT,
    terrain TEXT
);
CREATE TABLE IF NOT EXISTS "character" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    height TEXT,
    weight TEXT,
    gender TEXT
);
CREATE TABLE IF NOT EXISTS favorite (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES "user"(id),
    planet_id INTEGER REFERENCES planet(id),
    character_id INTEGER REFERENCES "character"(id)
);
CREATE INDEX IF NOT EXISTS idx_favorite_user ON favorite(user_id);
"#;

const SELECT_FAVORITES: &str = r#"
SELECT f.id, f.user_id,
       p.id, p.name, p.climate, p.terrain,
       c.id, c.name, c.height, c.weight, c.gender
FROM favorite f
LEFT JOIN planet p ON p.id = f.planet_id
LEFT JOIN "character" c ON c.id = f.character_id
WHERE f.user_id = ?1
ORDER BY f.id ASC
"#;

/// Outcome of adding a favorite, enough to build the confirmation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteAdded {
    pub favorite_id: RecordId,
    pub user_first_name: String,
    pub target_name: String,
}

/// SQLite store for users, planets, characters and favorites
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a file-backed database
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Create an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `op` inside a transaction. Dropping the transaction on error
    /// rolls it back.
    fn with_tx<T>(&self, op: impl FnOnce(&Connection) -> StorageResult<T>) -> StorageResult<T> {
        let mut conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let tx = conn.transaction()?;
        let out = op(&*tx)?;
        tx.commit()?;
        Ok(out)
    }

    // ==================
    // Users
    // ==================

    pub fn create_user(&self, new_user: &NewUser) -> StorageResult<User> {
        let subscribed_at = Local::now().naive_local();
        self.with_tx(|conn| {
            conn.execute(
                r#"INSERT INTO "user" (email, password, first_name, last_name, subscription_date)
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
                params![
                    new_user.email,
                    new_user.password,
                    new_user.first_name,
                    new_user.last_name,
                    subscribed_at,
                ],
            )?;
            load_user(conn, conn.last_insert_rowid())
        })
    }

    pub fn list_users(&self) -> StorageResult<Vec<User>> {
        self.with_tx(|conn| {
            let mut stmt = conn.prepare(
                r#"SELECT id, email, password, first_name, last_name, subscription_date
                   FROM "user" ORDER BY id ASC"#,
            )?;
            let mut users = stmt
                .query_map([], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;

            for user in &mut users {
                user.favorites = load_favorites(conn, user.id)?;
            }
            Ok(users)
        })
    }

    /// Favorites of an existing user, oldest first
    pub fn user_favorites(&self, user_id: RecordId) -> StorageResult<Vec<Favorite>> {
        self.with_tx(|conn| {
            user_first_name(conn, user_id)?;
            load_favorites(conn, user_id)
        })
    }

    // ==================
    // Planets
    // ==================

    pub fn create_planet(&self, new_planet: &NewPlanet) -> StorageResult<Planet> {
        self.with_tx(|conn| {
            conn.execute(
                "INSERT INTO planet (name, climate, terrain) VALUES (?1, ?2, ?3)",
                params![new_planet.name, new_planet.climate, new_planet.terrain],
            )?;
            load_planet(conn, conn.last_insert_rowid())
        })
    }

    pub fn list_planets(&self) -> StorageResult<Vec<Planet>> {
        self.with_tx(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, climate, terrain FROM planet ORDER BY id ASC")?;
            let planets = stmt
                .query_map([], |row| row_to_planet(row, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(planets)
        })
    }

    pub fn get_planet(&self, planet_id: RecordId) -> StorageResult<Planet> {
        self.with_tx(|conn| load_planet(conn, planet_id))
    }

    // ==================
    // Characters
    // ==================

    pub fn create_character(&self, new_character: &NewCharacter) -> StorageResult<Character> {
        self.with_tx(|conn| {
            conn.execute(
                r#"INSERT INTO "character" (name, height, weight, gender)
                   VALUES (?1, ?2, ?3, ?4)"#,
                params![
                    new_character.name,
                    new_character.height,
                    new_character.weight,
                    new_character.gender,
                ],
            )?;
            load_character(conn, conn.last_insert_rowid())
        })
    }

    pub fn list_characters(&self) -> StorageResult<Vec<Character>> {
        self.with_tx(|conn| {
            let mut stmt = conn.prepare(
                r#"SELECT id, name, height, weight, gender FROM "character" ORDER BY id ASC"#,
            )?;
            let characters = stmt
                .query_map([], |row| row_to_character(row, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(characters)
        })
    }

    pub fn get_character(&self, character_id: RecordId) -> StorageResult<Character> {
        self.with_tx(|conn| load_character(conn, character_id))
    }

    // ==================
    // Favorites
    // ==================

    /// Add a favorite for `user_id`.
    ///
    /// The user is checked before the target. Duplicate favorites are
    /// allowed.
    pub fn add_favorite(
        &self,
        user_id: RecordId,
        target: FavoriteTarget,
    ) -> StorageResult<FavoriteAdded> {
        self.with_tx(|conn| {
            let user_first_name = user_first_name(conn, user_id)?;
            let target_name = target_name(conn, target)?;

            let (planet_id, character_id) = match target {
                FavoriteTarget::Planet(id) => (Some(id), None),
                FavoriteTarget::Character(id) => (None, Some(id)),
            };
            conn.execute(
                "INSERT INTO favorite (user_id, planet_id, character_id) VALUES (?1, ?2, ?3)",
                params![user_id, planet_id, character_id],
            )?;

            Ok(FavoriteAdded {
                favorite_id: conn.last_insert_rowid(),
                user_first_name,
                target_name,
            })
        })
    }

    /// Remove one favorite of `user_id` pointing at `target`.
    ///
    /// When several rows match, the oldest one goes. Returns the id of the
    /// deleted row.
    pub fn remove_favorite(
        &self,
        user_id: RecordId,
        target: FavoriteTarget,
    ) -> StorageResult<RecordId> {
        self.with_tx(|conn| {
            user_first_name(conn, user_id)?;

            let (sql, missing) = match target {
                FavoriteTarget::Planet(_) => (
                    "SELECT id FROM favorite WHERE user_id = ?1 AND planet_id = ?2
                     ORDER BY id ASC LIMIT 1",
                    Entity::FavoritePlanet,
                ),
                FavoriteTarget::Character(_) => (
                    "SELECT id FROM favorite WHERE user_id = ?1 AND character_id = ?2
                     ORDER BY id ASC LIMIT 1",
                    Entity::FavoriteCharacter,
                ),
            };
            let favorite_id: RecordId = conn
                .query_row(sql, params![user_id, target.id()], |row| row.get(0))
                .optional()?
                .ok_or(StorageError::NotFound(missing))?;

            conn.execute("DELETE FROM favorite WHERE id = ?1", [favorite_id])?;
            Ok(favorite_id)
        })
    }

    /// Total number of favorite rows across all users
    pub fn favorite_count(&self) -> StorageResult<usize> {
        self.with_tx(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM favorite", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}

// ==================
// Row helpers
// ==================

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let subscription_date: NaiveDateTime = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        subscription_date,
        favorites: Vec::new(),
    })
}

/// Map a planet starting at column `at`
fn row_to_planet(row: &Row<'_>, at: usize) -> rusqlite::Result<Planet> {
    Ok(Planet {
        id: row.get(at)?,
        name: row.get(at + 1)?,
        climate: row.get(at + 2)?,
        terrain: row.get(at + 3)?,
    })
}

/// Map a character starting at column `at`
fn row_to_character(row: &Row<'_>, at: usize) -> rusqlite::Result<Character> {
    Ok(Character {
        id: row.get(at)?,
        name: row.get(at + 1)?,
        height: row.get(at + 2)?,
        weight: row.get(at + 3)?,
        gender: row.get(at + 4)?,
    })
}

/// Map a row of `SELECT_FAVORITES`. A NULL joined id means the reference is unset.
fn row_to_favorite(row: &Row<'_>) -> rusqlite::Result<Favorite> {
    let planet = match row.get::<_, Option<RecordId>>(2)? {
        Some(_) => Some(row_to_planet(row, 2)?),
        None => None,
    };
    let character = match row.get::<_, Option<RecordId>>(6)? {
        Some(_) => Some(row_to_character(row, 6)?),
        None => None,
    };

    Ok(Favorite {
        id: row.get(0)?,
        user_id: row.get(1)?,
        planet,
        character,
    })
}

fn load_user(conn: &Connection, user_id: RecordId) -> StorageResult<User> {
    let mut user = conn
        .query_row(
            r#"SELECT id, email, password, first_name, last_name, subscription_date
               FROM "user" WHERE id = ?1"#,
            [user_id],
            row_to_user,
        )
        .optional()?
        .ok_or(StorageError::NotFound(Entity::User))?;

    user.favorites = load_favorites(conn, user_id)?;
    Ok(user)
}

fn load_favorites(conn: &Connection, user_id: RecordId) -> StorageResult<Vec<Favorite>> {
    let mut stmt = conn.prepare(SELECT_FAVORITES)?;
    let favorites = stmt
        .query_map([user_id], row_to_favorite)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(favorites)
}

fn load_planet(conn: &Connection, planet_id: RecordId) -> StorageResult<Planet> {
    conn.query_row(
        "SELECT id, name, climate, terrain FROM planet WHERE id = ?1",
        [planet_id],
        |row| row_to_planet(row, 0),
    )
    .optional()?
    .ok_or(StorageError::NotFound(Entity::Planet))
}

fn load_character(conn: &Connection, character_id: RecordId) -> StorageResult<Character> {
    conn.query_row(
        r#"SELECT id, name, height, weight, gender FROM "character" WHERE id = ?1"#,
        [character_id],
        |row| row_to_character(row, 0),
    )
    .optional()?
    .ok_or(StorageError::NotFound(Entity::Character))
}

fn user_first_name(conn: &Connection, user_id: RecordId) -> StorageResult<String> {
    conn.query_row(
        r#"SELECT first_name FROM "user" WHERE id = ?1"#,
        [user_id],
        |row| row.get(0),
    )
    .optional()?
    .ok_or(StorageError::NotFound(Entity::User))
}

fn target_name(conn: &Connection, target: FavoriteTarget) -> StorageResult<String> {
    let (sql, missing) = match target {
        FavoriteTarget::Planet(_) => ("SELECT name FROM planet WHERE id = ?1", Entity::Planet),
        FavoriteTarget::Character(_) => (
            r#"SELECT name FROM "character" WHERE id = ?1"#,
            Entity::Character,
        ),
    };
    conn.query_row(sql, [target.id()], |row| row.get(0))
        .optional()?
        .ok_or(StorageError::NotFound(missing))
}
