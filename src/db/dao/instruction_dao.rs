use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{instruction, prelude::Instruction};

const BY_STEP: &[(instruction::Column, Order)] = &[
    (instruction::Column::StepNumber, Order::Asc),
    (instruction::Column::CreatedAt, Order::Asc),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionFields {
    pub step_number: i32,
    pub description: String,
}

#[derive(Clone)]
pub struct InstructionDao {
    db: DatabaseConnection,
}

impl DaoBase for InstructionDao {
    type Entity = Instruction;
    const ENTITY_NAME: &'static str = "instruction";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl InstructionDao {
    pub async fn create_instruction(
        &self,
        recipe_id: Uuid,
        fields: InstructionFields,
    ) -> DaoResult<instruction::Model> {
        let model = instruction::ActiveModel {
            recipe_id: Set(recipe_id),
            step_number: Set(fields.step_number),
            description: Set(fields.description),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn update_instruction(
        &self,
        id: Uuid,
        fields: InstructionFields,
    ) -> DaoResult<instruction::Model> {
        self.update(id, move |active| {
            active.step_number = Set(fields.step_number);
            active.description = Set(fields.description);
        })
        .await
    }

    /// Ordered by step number; equal steps keep insertion order.
    pub async fn list_for_recipe(&self, recipe_id: Uuid) -> DaoResult<Vec<instruction::Model>> {
        self.find_all(BY_STEP, move |query| {
            query.filter(instruction::Column::RecipeId.eq(recipe_id))
        })
        .await
    }
}
