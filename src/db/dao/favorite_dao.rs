use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::OnConflict,
};
use uuid::Uuid;

use super::{DaoLayerError, DaoResult};
use crate::db::entities::{favorite, prelude::Favorite};

/// Favorites are keyed by `(user, recipe)` so they sit outside [`super::DaoBase`].
#[derive(Clone)]
pub struct FavoriteDao {
    db: DatabaseConnection,
}

impl FavoriteDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    /// Returns whether a new row was written; re-adding is a no-op.
    pub async fn add(&self, user_id: Uuid, recipe_id: Uuid) -> DaoResult<bool> {
        let model = favorite::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(Utc::now().fixed_offset()),
        };
        let inserted = Favorite::insert(model)
            .on_conflict(
                OnConflict::columns([favorite::Column::UserId, favorite::Column::RecipeId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(inserted > 0)
    }

    pub async fn remove(&self, user_id: Uuid, recipe_id: Uuid) -> DaoResult<bool> {
        let result = Favorite::delete_many()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    pub async fn is_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> DaoResult<bool> {
        Favorite::find_by_id((user_id, recipe_id))
            .one(&self.db)
            .await
            .map(|row| row.is_some())
            .map_err(DaoLayerError::Db)
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> DaoResult<u64> {
        Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::FavoriteDao;
    use crate::db::entities::favorite;

    #[tokio::test]
    async fn add_reports_duplicate_as_not_inserted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let dao = FavoriteDao::new(&db);
        let (user, recipe) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(dao.add(user, recipe).await.expect("first add"));
        assert!(!dao.add(user, recipe).await.expect("second add"));
    }

    #[tokio::test]
    async fn is_favorite_checks_composite_key() {
        let (user, recipe) = (Uuid::new_v4(), Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![favorite::Model {
                user_id: user,
                recipe_id: recipe,
                created_at: Utc::now().fixed_offset(),
            }]])
            .append_query_results([Vec::<favorite::Model>::new()])
            .into_connection();
        let dao = FavoriteDao::new(&db);

        assert!(dao.is_favorite(user, recipe).await.expect("lookup"));
        assert!(!dao.is_favorite(user, Uuid::new_v4()).await.expect("lookup"));
    }
}
