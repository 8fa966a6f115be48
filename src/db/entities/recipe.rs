use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(indexed)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub servings: i32,
    #[sea_orm(column_type = "Text")]
    pub notes: Option<String>,
    #[sea_orm(indexed)]
    pub author_id: Option<Uuid>,
    #[sea_orm(belongs_to, from = "author_id", to = "id", on_delete = "SetNull")]
    pub author: HasOne<super::user::Entity>,
    #[sea_orm(has_many)]
    pub ingredients: HasMany<super::ingredient::Entity>,
    #[sea_orm(has_many)]
    pub instructions: HasMany<super::instruction::Entity>,
    #[sea_orm(has_many)]
    pub favorites: HasMany<super::favorite::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_authored_by(&self, user_id: &Uuid) -> bool {
        self.author_id.as_ref() == Some(user_id)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
