use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(indexed)]
    pub email: String,
    pub password_hash: String,
    #[sea_orm(default_value = true)]
    pub is_active: bool,
    pub last_login_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(has_many)]
    pub recipes: HasMany<super::recipe::Entity>,
    #[sea_orm(has_many)]
    pub favorites: HasMany<super::favorite::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}
