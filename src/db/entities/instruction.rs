use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

const SUMMARY_CHARS: usize = 100;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "instructions")]
pub struct Model {
    #[sea_orm(indexed)]
    pub recipe_id: Uuid,
    pub step_number: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(belongs_to, from = "recipe_id", to = "id", on_delete = "Cascade")]
    pub recipe: HasOne<super::recipe::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary: String = self.description.chars().take(SUMMARY_CHARS).collect();
        write!(f, "{summary}...")
    }
}
