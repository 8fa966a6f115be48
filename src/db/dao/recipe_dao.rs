use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityName, Order, QueryFilter, Select, Set,
    sea_query::Query,
};
use uuid::Uuid;

use super::{DaoBase, DaoResult, PaginatedResponse};
use crate::db::entities::{favorite, prelude::Recipe, recipe};

const BY_NAME: &[(recipe::Column, Order)] = &[(recipe::Column::Name, Order::Asc)];

/// Editable recipe columns, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFields {
    pub name: String,
    pub description: String,
    pub servings: i32,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct RecipeDao {
    db: DatabaseConnection,
}

impl DaoBase for RecipeDao {
    type Entity = Recipe;
    const ENTITY_NAME: &'static str = "recipe";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn authored_by(author_id: Uuid) -> impl Fn(Select<Recipe>) -> Select<Recipe> + Send + Sync {
    move |query| query.filter(recipe::Column::AuthorId.eq(author_id))
}

fn favorited_by(user_id: Uuid) -> impl Fn(Select<Recipe>) -> Select<Recipe> + Send + Sync {
    move |query| {
        query.filter(
            recipe::Column::Id.in_subquery(
                Query::select()
                    .column(favorite::Column::RecipeId)
                    .from(favorite::Entity.table_ref())
                    .and_where(favorite::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        )
    }
}

impl RecipeDao {
    pub async fn create_recipe(
        &self,
        author_id: Uuid,
        fields: RecipeFields,
    ) -> DaoResult<recipe::Model> {
        let model = recipe::ActiveModel {
            name: Set(fields.name),
            description: Set(fields.description),
            servings: Set(fields.servings),
            notes: Set(fields.notes),
            author_id: Set(Some(author_id)),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn update_recipe(&self, id: Uuid, fields: RecipeFields) -> DaoResult<recipe::Model> {
        self.update(id, move |active| {
            active.name = Set(fields.name);
            active.description = Set(fields.description);
            active.servings = Set(fields.servings);
            active.notes = Set(fields.notes);
        })
        .await
    }

    pub async fn newest(&self, limit: u64) -> DaoResult<Vec<recipe::Model>> {
        self.find(1, limit, &[], |query| query)
            .await
            .map(|response| response.data)
    }

    pub async fn count_all(&self) -> DaoResult<u64> {
        self.count(|query| query).await
    }

    pub async fn page_by_name(
        &self,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<recipe::Model>> {
        self.find(page, page_size, BY_NAME, |query| query).await
    }

    pub async fn count_by_author(&self, author_id: Uuid) -> DaoResult<u64> {
        self.count(authored_by(author_id)).await
    }

    pub async fn page_by_author(
        &self,
        author_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<recipe::Model>> {
        self.find(page, page_size, BY_NAME, authored_by(author_id))
            .await
    }

    pub async fn count_favorites_of(&self, user_id: Uuid) -> DaoResult<u64> {
        self.count(favorited_by(user_id)).await
    }

    pub async fn page_favorites_of(
        &self,
        user_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<recipe::Model>> {
        self.find(page, page_size, BY_NAME, favorited_by(user_id))
            .await
    }
}
