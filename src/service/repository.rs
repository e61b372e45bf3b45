//! Generic entity persistence over a single transaction.

use crate::error::AppError;
use crate::models::{Changeset, Entity, Favorite};
use crate::sql::{self, bind_all, QueryBuf};
use sqlx::any::{Any, AnyRow};
use sqlx::{AnyPool, FromRow, Row, Transaction};

/// One request, one transaction. Writes become visible only after
/// [`Repository::commit`]; dropping the repository rolls back.
pub struct Repository {
    tx: Transaction<'static, Any>,
}

impl Repository {
    pub async fn begin(pool: &AnyPool) -> Result<Self, AppError> {
        Ok(Repository {
            tx: pool.begin().await?,
        })
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn list<E: Entity>(&mut self) -> Result<Vec<E>, AppError> {
        self.fetch_all(sql::select_all::<E>()).await
    }

    pub async fn find<E: Entity>(&mut self, id: i64) -> Result<Option<E>, AppError> {
        let rows: Vec<E> = self.fetch_all(sql::select_by_id::<E>(id)).await?;
        Ok(rows.into_iter().next())
    }

    /// Like [`find`](Self::find) but a missing row is `"<Entity> with id <id> not found"`.
    pub async fn get<E: Entity>(&mut self, id: i64) -> Result<E, AppError> {
        self.find(id).await?.ok_or_else(|| AppError::missing(E::LABEL, id))
    }

    pub async fn exists<E: Entity>(&mut self, id: i64) -> Result<bool, AppError> {
        let QueryBuf { sql, params } = sql::exists::<E>(id);
        tracing::debug!(sql = %sql, params = ?params, "query");
        let row = bind_all(sqlx::query(&sql), params)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.is_some())
    }

    /// Require that the row exists, failing with the templated not-found message.
    pub async fn require<E: Entity>(&mut self, id: i64) -> Result<(), AppError> {
        if self.exists::<E>(id).await? {
            Ok(())
        } else {
            Err(AppError::missing(E::LABEL, id))
        }
    }

    /// Insert and return the generated id.
    pub async fn insert<C: Changeset>(&mut self, changes: C) -> Result<i64, AppError> {
        let QueryBuf { sql, params } = sql::insert(changes);
        tracing::debug!(sql = %sql, params = ?redacted(&params), "insert");
        let row = bind_all(sqlx::query(&sql), params)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(write_error::<C::Target>)?;
        Ok(row.try_get::<i64, _>("id")?)
    }

    pub async fn update<C: Changeset>(&mut self, id: i64, changes: C) -> Result<(), AppError> {
        let QueryBuf { sql, params } = sql::update(id, changes);
        tracing::debug!(sql = %sql, params = ?redacted(&params), "update");
        let result = bind_all(sqlx::query(&sql), params)
            .execute(&mut *self.tx)
            .await
            .map_err(write_error::<C::Target>)?;
        if result.rows_affected() == 0 {
            return Err(AppError::missing(C::Target::LABEL, id));
        }
        Ok(())
    }

    pub async fn delete<E: Entity>(&mut self, id: i64) -> Result<(), AppError> {
        let QueryBuf { sql, params } = sql::delete::<E>(id);
        tracing::debug!(sql = %sql, params = ?params, "delete");
        let result = bind_all(sqlx::query(&sql), params)
            .execute(&mut *self.tx)
            .await
            .map_err(write_error::<E>)?;
        if result.rows_affected() == 0 {
            return Err(AppError::missing(E::LABEL, id));
        }
        Ok(())
    }

    pub async fn favorites_of(&mut self, user_id: i64) -> Result<Vec<Favorite>, AppError> {
        self.fetch_all(sql::select_where::<Favorite>("user_id", user_id))
            .await
    }

    async fn fetch_all<E: Entity>(&mut self, q: QueryBuf) -> Result<Vec<E>, AppError> {
        let QueryBuf { sql, params } = q;
        tracing::debug!(sql = %sql, params = ?params, "query");
        let rows: Vec<AnyRow> = bind_all(sqlx::query(&sql), params)
            .fetch_all(&mut *self.tx)
            .await?;
        let entities = rows
            .iter()
            .map(|row| E::from_row(row))
            .collect::<Result<Vec<E>, sqlx::Error>>()?;
        Ok(entities)
    }
}

/// Text params may carry password hashes; log only their shape.
fn redacted(params: &[sql::BindValue]) -> Vec<&'static str> {
    params
        .iter()
        .map(|p| match p {
            sql::BindValue::Null => "null",
            sql::BindValue::Int(_) => "int",
            sql::BindValue::Text(_) => "text",
        })
        .collect()
}

fn write_error<E: Entity>(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("{} already exists", E::LABEL))
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::BadRequest(format!("{} references a row that does not exist", E::LABEL))
        }
        _ => AppError::Db(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Character, FavoriteTarget, NameChange, NewFavorite, NewUser, Planet, User, UserChanges,
    };
    use crate::settings::Settings;
    use crate::store;

    async fn pool() -> AnyPool {
        store::open(&Settings::in_memory()).await.unwrap()
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            name: "Han".into(),
            username: username.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn insert_then_read_back() {
        let pool = pool().await;
        let mut repo = Repository::begin(&pool).await.unwrap();
        let id = repo.insert(new_user("han")).await.unwrap();
        repo.commit().await.unwrap();

        let mut repo = Repository::begin(&pool).await.unwrap();
        let user: User = repo.get(id).await.unwrap();
        assert_eq!(user.username, "han");
        assert_eq!(repo.list::<User>().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dropped_repository_rolls_back() {
        let pool = pool().await;
        {
            let mut repo = Repository::begin(&pool).await.unwrap();
            repo.insert(NameChange::<Planet>::new("Hoth".into())).await.unwrap();
        }
        let mut repo = Repository::begin(&pool).await.unwrap();
        assert!(repo.list::<Planet>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let pool = pool().await;
        let mut repo = Repository::begin(&pool).await.unwrap();
        repo.insert(new_user("han")).await.unwrap();
        let err = repo.insert(new_user("han")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let pool = pool().await;
        let mut repo = Repository::begin(&pool).await.unwrap();
        let err = repo
            .update(
                3,
                UserChanges {
                    name: "x".into(),
                    username: "y".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User with id 3 not found");
        let err = repo.delete::<Character>(8).await.unwrap_err();
        assert_eq!(err.to_string(), "Character with id 8 not found");
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_favorites() {
        let pool = pool().await;
        let mut repo = Repository::begin(&pool).await.unwrap();
        let user_id = repo.insert(new_user("leia")).await.unwrap();
        let planet_id = repo.insert(NameChange::<Planet>::new("Alderaan".into())).await.unwrap();
        repo.insert(NewFavorite {
            user_id,
            target: FavoriteTarget::Planet(planet_id),
        })
        .await
        .unwrap();
        assert_eq!(repo.favorites_of(user_id).await.unwrap().len(), 1);

        repo.delete::<User>(user_id).await.unwrap();
        assert!(repo.favorites_of(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn favorite_with_unknown_reference_is_rejected_by_the_store() {
        let pool = pool().await;
        let mut repo = Repository::begin(&pool).await.unwrap();
        let err = repo
            .insert(NewFavorite {
                user_id: 42,
                target: FavoriteTarget::Character(1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");
    }
}
