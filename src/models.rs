//! Persisted entities and the changesets that write them.

use crate::sql::BindValue;
use serde::{Serialize, Serializer};
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};
use std::marker::PhantomData;

/// A table-backed record type. `COLUMNS` is what reads select; anything not
/// listed (e.g. the password hash) never leaves the database.
pub trait Entity: for<'r> FromRow<'r, AnyRow> + Serialize + Send + Unpin + 'static {
    const TABLE: &'static str;
    /// Human name used in messages ("User with id 3 not found").
    const LABEL: &'static str;
    const COLUMNS: &'static [&'static str];
}

/// Column/value pairs for one INSERT or UPDATE against `Target`.
pub trait Changeset: Send {
    type Target: Entity;

    fn into_values(self) -> Vec<(&'static str, BindValue)>;
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const LABEL: &'static str = "User";
    const COLUMNS: &'static [&'static str] = &["id", "name", "username"];
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password_hash: String,
}

impl Changeset for NewUser {
    type Target = User;

    fn into_values(self) -> Vec<(&'static str, BindValue)> {
        vec![
            ("name", BindValue::Text(self.name)),
            ("username", BindValue::Text(self.username)),
            ("password", BindValue::Text(self.password_hash)),
        ]
    }
}

/// PUT on a user rewrites name and username; the password is not touched.
#[derive(Debug)]
pub struct UserChanges {
    pub name: String,
    pub username: String,
}

impl Changeset for UserChanges {
    type Target = User;

    fn into_values(self) -> Vec<(&'static str, BindValue)> {
        vec![
            ("name", BindValue::Text(self.name)),
            ("username", BindValue::Text(self.username)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Character {
    pub id: i64,
    pub name: String,
}

impl Entity for Character {
    const TABLE: &'static str = "characters";
    const LABEL: &'static str = "Character";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Planet {
    pub id: i64,
    pub name: String,
}

impl Entity for Planet {
    const TABLE: &'static str = "planets";
    const LABEL: &'static str = "Planet";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
}

/// Entities whose only writable field is `name`.
pub trait NamedEntity: Entity {}

impl NamedEntity for Character {}
impl NamedEntity for Planet {}

/// Create or rename a [`NamedEntity`].
#[derive(Debug)]
pub struct NameChange<E> {
    pub name: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E> NameChange<E> {
    pub fn new(name: String) -> Self {
        NameChange {
            name,
            _entity: PhantomData,
        }
    }
}

impl<E: NamedEntity> Changeset for NameChange<E> {
    type Target = E;

    fn into_values(self) -> Vec<(&'static str, BindValue)> {
        vec![("name", BindValue::Text(self.name))]
    }
}

/// What a favorite points at. Exactly one per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteTarget {
    Character(i64),
    Planet(i64),
}

impl FavoriteTarget {
    pub fn from_columns(character_id: Option<i64>, planet_id: Option<i64>) -> Option<Self> {
        match (character_id, planet_id) {
            (Some(id), None) => Some(FavoriteTarget::Character(id)),
            (None, Some(id)) => Some(FavoriteTarget::Planet(id)),
            _ => None,
        }
    }

    pub fn character_id(&self) -> Option<i64> {
        match self {
            FavoriteTarget::Character(id) => Some(*id),
            FavoriteTarget::Planet(_) => None,
        }
    }

    pub fn planet_id(&self) -> Option<i64> {
        match self {
            FavoriteTarget::Planet(id) => Some(*id),
            FavoriteTarget::Character(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub target: FavoriteTarget,
}

impl Entity for Favorite {
    const TABLE: &'static str = "favorites";
    const LABEL: &'static str = "Favorite";
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "character_id", "planet_id"];
}

impl<'r> FromRow<'r, AnyRow> for Favorite {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        let character_id: Option<i64> = row.try_get("character_id")?;
        let planet_id: Option<i64> = row.try_get("planet_id")?;
        let target = FavoriteTarget::from_columns(character_id, planet_id).ok_or_else(|| {
            sqlx::Error::ColumnDecode {
                index: "character_id".into(),
                source: "favorite must reference exactly one of character_id or planet_id".into(),
            }
        })?;
        Ok(Favorite {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            target,
        })
    }
}

#[derive(Serialize)]
struct FavoriteWire {
    id: i64,
    user_id: i64,
    character_id: Option<i64>,
    planet_id: Option<i64>,
}

impl Serialize for Favorite {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FavoriteWire {
            id: self.id,
            user_id: self.user_id,
            character_id: self.target.character_id(),
            planet_id: self.target.planet_id(),
        }
        .serialize(serializer)
    }
}

#[derive(Debug)]
pub struct NewFavorite {
    pub user_id: i64,
    pub target: FavoriteTarget,
}

impl Changeset for NewFavorite {
    type Target = Favorite;

    fn into_values(self) -> Vec<(&'static str, BindValue)> {
        vec![
            ("user_id", BindValue::Int(self.user_id)),
            ("character_id", self.target.character_id().into()),
            ("planet_id", self.target.planet_id().into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn favorite_serializes_both_reference_columns() {
        let fav = Favorite {
            id: 7,
            user_id: 1,
            target: FavoriteTarget::Planet(3),
        };
        assert_eq!(
            serde_json::to_value(&fav).unwrap(),
            json!({"id": 7, "user_id": 1, "character_id": null, "planet_id": 3})
        );
    }

    #[test]
    fn favorite_target_requires_exactly_one_column() {
        assert_eq!(
            FavoriteTarget::from_columns(Some(2), None),
            Some(FavoriteTarget::Character(2))
        );
        assert_eq!(FavoriteTarget::from_columns(None, None), None);
        assert_eq!(FavoriteTarget::from_columns(Some(1), Some(2)), None);
    }

    #[test]
    fn user_never_exposes_password() {
        assert!(!User::COLUMNS.contains(&"password"));
        let user = User {
            id: 1,
            name: "Leia".into(),
            username: "leia".into(),
        };
        assert_eq!(
            serde_json::to_value(user).unwrap(),
            json!({"id": 1, "name": "Leia", "username": "leia"})
        );
    }

    #[test]
    fn new_favorite_writes_null_for_the_other_target() {
        let values = NewFavorite {
            user_id: 4,
            target: FavoriteTarget::Character(9),
        }
        .into_values();
        assert_eq!(
            values,
            vec![
                ("user_id", BindValue::Int(4)),
                ("character_id", BindValue::Int(9)),
                ("planet_id", BindValue::Null),
            ]
        );
    }
}
