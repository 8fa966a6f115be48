use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(indexed)]
    pub recipe_id: Uuid,
    pub name: String,
    pub amount: String,
    pub preparation: Option<String>,
    #[sea_orm(belongs_to, from = "recipe_id", to = "id", on_delete = "Cascade")]
    pub recipe: HasOne<super::recipe::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.name)?;
        match self.preparation.as_deref() {
            Some(preparation) if !preparation.is_empty() => write!(f, ", {preparation}"),
            _ => Ok(()),
        }
    }
}
