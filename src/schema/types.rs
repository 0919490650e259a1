//! Record definitions and their JSON shape
//!
//! Stored rows and request payloads are separate types. Payload fields are all
//! optional: a missing field reaches the store as NULL and is rejected there by
//! the column constraints. Scalar values (numbers, booleans) are kept as their
//! JSON text, the same way a text column stores them.

use chrono::NaiveDateTime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Format used when a user's subscription date is serialized
pub const SUBSCRIPTION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Primary key type shared by all tables
pub type RecordId = i64;

/// A registered user together with its current favorites
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: RecordId,
    pub email: String,
    /// Opaque, stored as given and never serialized
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(serialize_with = "serialize_subscription_date")]
    pub subscription_date: NaiveDateTime,
    pub favorites: Vec<Favorite>,
}

fn serialize_subscription_date<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&date.format(SUBSCRIPTION_DATE_FORMAT))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Planet {
    pub id: RecordId,
    pub name: String,
    pub climate: Option<String>,
    pub terrain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub id: RecordId,
    pub name: String,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub gender: Option<String>,
}

/// A favorite with its planet and character resolved.
///
/// Both references are optional and may be set together. Unset references
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    pub id: RecordId,
    pub user_id: RecordId,
    pub planet: Option<Planet>,
    pub character: Option<Character>,
}

/// Body of `POST /post-new-user`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    #[serde(default, deserialize_with = "text_field")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub last_name: Option<String>,
}

/// Body of `POST /post-new-planet`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlanet {
    #[serde(default, deserialize_with = "text_field")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub climate: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub terrain: Option<String>,
}

/// Body of `POST /post-new-character`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCharacter {
    #[serde(default, deserialize_with = "text_field")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub gender: Option<String>,
}

/// Accept a string or any JSON scalar as column text.
///
/// `null` and a missing field both become `None`. Arrays and objects have no
/// text form and are rejected.
fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(scalar.to_string())),
        Some(_) => Err(D::Error::custom("expected a string or a scalar value")),
    }
}

/// What a favorite points at when it is added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteTarget {
    Planet(RecordId),
    Character(RecordId),
}

impl FavoriteTarget {
    /// Id of the referenced planet or character
    pub fn id(&self) -> RecordId {
        match self {
            FavoriteTarget::Planet(id) | FavoriteTarget::Character(id) => *id,
        }
    }

    /// Display label used in response messages
    pub fn label(&self) -> &'static str {
        match self {
            FavoriteTarget::Planet(_) => "Planet",
            FavoriteTarget::Character(_) => "Character",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 4)
            .unwrap()
            .and_hms_milli_opt(9, 30, 15, 250)
            .unwrap()
    }

    fn tatooine() -> Planet {
        Planet {
            id: 1,
            name: "Tatooine".to_string(),
            climate: Some("arid".to_string()),
            terrain: None,
        }
    }

    #[test]
    fn test_user_serialization_hides_password() {
        let user = User {
            id: 7,
            email: "luke@rebellion.org".to_string(),
            password: "hunter2".to_string(),
            first_name: "Luke".to_string(),
            last_name: "Skywalker".to_string(),
            subscription_date: sample_date(),
            favorites: vec![],
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["subscription_date"], "2024-05-04 09:30:15");
        assert_eq!(value["favorites"], json!([]));
        assert_eq!(value["email"], "luke@rebellion.org");
    }

    #[test]
    fn test_favorite_serializes_missing_refs_as_null() {
        let favorite = Favorite {
            id: 3,
            user_id: 7,
            planet: Some(tatooine()),
            character: None,
        };

        let value = serde_json::to_value(&favorite).unwrap();
        assert_eq!(value["planet"]["name"], "Tatooine");
        assert_eq!(value["planet"]["terrain"], serde_json::Value::Null);
        assert!(value["character"].is_null());
        assert_eq!(value["user_id"], 7);
    }

    #[test]
    fn test_new_user_tolerates_missing_and_unknown_fields() {
        let payload: NewUser =
            serde_json::from_value(json!({"email": "leia@alderaan.gov", "rank": "princess"}))
                .unwrap();

        assert_eq!(payload.email.as_deref(), Some("leia@alderaan.gov"));
        assert!(payload.password.is_none());
        assert!(payload.first_name.is_none());
    }

    #[test]
    fn test_scalar_fields_are_kept_as_text() {
        let payload: NewCharacter = serde_json::from_value(json!({
            "name": "Luke Skywalker",
            "height": 172,
            "weight": 77.5,
            "gender": null
        }))
        .unwrap();

        assert_eq!(payload.name.as_deref(), Some("Luke Skywalker"));
        assert_eq!(payload.height.as_deref(), Some("172"));
        assert_eq!(payload.weight.as_deref(), Some("77.5"));
        assert!(payload.gender.is_none());
    }

    #[test]
    fn test_nested_field_values_are_rejected() {
        let result: Result<NewPlanet, _> =
            serde_json::from_value(json!({"name": "Naboo", "terrain": ["swamp", "plains"]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_favorite_target_accessors() {
        let planet = FavoriteTarget::Planet(4);
        let character = FavoriteTarget::Character(9);

        assert_eq!(planet.id(), 4);
        assert_eq!(planet.label(), "Planet");
        assert_eq!(character.id(), 9);
        assert_eq!(character.label(), "Character");
    }
}
