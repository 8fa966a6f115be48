use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{ingredient, prelude::Ingredient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientFields {
    pub name: String,
    pub amount: String,
    pub preparation: Option<String>,
}

#[derive(Clone)]
pub struct IngredientDao {
    db: DatabaseConnection,
}

impl DaoBase for IngredientDao {
    type Entity = Ingredient;
    const ENTITY_NAME: &'static str = "ingredient";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl IngredientDao {
    pub async fn create_ingredient(
        &self,
        recipe_id: Uuid,
        fields: IngredientFields,
    ) -> DaoResult<ingredient::Model> {
        let model = ingredient::ActiveModel {
            recipe_id: Set(recipe_id),
            name: Set(fields.name),
            amount: Set(fields.amount),
            preparation: Set(fields.preparation),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn update_ingredient(
        &self,
        id: Uuid,
        fields: IngredientFields,
    ) -> DaoResult<ingredient::Model> {
        self.update(id, move |active| {
            active.name = Set(fields.name);
            active.amount = Set(fields.amount);
            active.preparation = Set(fields.preparation);
        })
        .await
    }

    /// In the order they were added.
    pub async fn list_for_recipe(&self, recipe_id: Uuid) -> DaoResult<Vec<ingredient::Model>> {
        self.find_all(&[(ingredient::Column::CreatedAt, Order::Asc)], move |query| {
            query.filter(ingredient::Column::RecipeId.eq(recipe_id))
        })
        .await
    }
}
