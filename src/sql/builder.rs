//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for an [`Entity`].

use crate::models::{Changeset, Entity};
use crate::sql::BindValue;

/// Quote identifier (safe: only from entity metadata).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_list(columns: &[&str]) -> String {
    columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// SELECT all rows ordered by id.
pub fn select_all<E: Entity>() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list(E::COLUMNS),
        quoted(E::TABLE),
        quoted("id")
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id<E: Entity>(id: i64) -> QueryBuf {
    select_where::<E>("id", id)
}

/// SELECT rows whose integer `column` equals `value`, ordered by id.
pub fn select_where<E: Entity>(column: &str, value: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::Int(value));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${} ORDER BY {}",
        column_list(E::COLUMNS),
        quoted(E::TABLE),
        quoted(column),
        n,
        quoted("id")
    );
    q
}

/// SELECT 1 if the row exists.
pub fn exists<E: Entity>(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::Int(id));
    q.sql = format!("SELECT 1 AS {} FROM {} WHERE {} = ${}", quoted("found"), quoted(E::TABLE), quoted("id"), n);
    q
}

/// INSERT the changeset's columns, returning the generated id.
pub fn insert<C: Changeset>(changes: C) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (name, value) in changes.into_values() {
        let n = q.push_param(value);
        cols.push(quoted(name));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(C::Target::TABLE),
        cols.join(", "),
        placeholders.join(", "),
        quoted("id")
    );
    q
}

/// UPDATE the changeset's columns on one row.
pub fn update<C: Changeset>(id: i64, changes: C) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (name, value) in changes.into_values() {
        let n = q.push_param(value);
        sets.push(format!("{} = ${}", quoted(name), n));
    }
    let n = q.push_param(BindValue::Int(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quoted(C::Target::TABLE),
        sets.join(", "),
        quoted("id"),
        n
    );
    q
}

pub fn delete<E: Entity>(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::Int(id));
    q.sql = format!("DELETE FROM {} WHERE {} = ${}", quoted(E::TABLE), quoted("id"), n);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Character, Favorite, NameChange, NewUser, User, UserChanges};

    #[test]
    fn select_all_lists_only_entity_columns() {
        let q = select_all::<User>();
        assert_eq!(
            q.sql,
            r#"SELECT "id", "name", "username" FROM "users" ORDER BY "id""#
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn select_where_filters_favorites_by_user() {
        let q = select_where::<Favorite>("user_id", 3);
        assert_eq!(
            q.sql,
            r#"SELECT "id", "user_id", "character_id", "planet_id" FROM "favorites" WHERE "user_id" = $1 ORDER BY "id""#
        );
        assert_eq!(q.params, vec![BindValue::Int(3)]);
    }

    #[test]
    fn insert_numbers_placeholders_in_column_order() {
        let q = insert(NewUser {
            name: "Han".into(),
            username: "han".into(),
            password_hash: "$argon2id$...".into(),
        });
        assert_eq!(
            q.sql,
            r#"INSERT INTO "users" ("name", "username", "password") VALUES ($1, $2, $3) RETURNING "id""#
        );
        assert_eq!(q.params.len(), 3);
    }

    #[test]
    fn update_binds_id_last() {
        let q = update(
            9,
            UserChanges {
                name: "Han Solo".into(),
                username: "solo".into(),
            },
        );
        assert_eq!(
            q.sql,
            r#"UPDATE "users" SET "name" = $1, "username" = $2 WHERE "id" = $3"#
        );
        assert_eq!(q.params.last(), Some(&BindValue::Int(9)));

        let q = update(2, NameChange::<Character>::new("Luke".into()));
        assert_eq!(q.sql, r#"UPDATE "characters" SET "name" = $1 WHERE "id" = $2"#);
    }

    #[test]
    fn delete_by_id() {
        let q = delete::<Character>(4);
        assert_eq!(q.sql, r#"DELETE FROM "characters" WHERE "id" = $1"#);
        assert_eq!(q.params, vec![BindValue::Int(4)]);
    }
}
