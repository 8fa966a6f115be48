//! Column and setter hooks implemented by `#[base_entity]` for every entity
//! carrying the shared `id` / `created_at` / `updated_at` columns.

use sea_orm::entity::prelude::DateTimeWithTimeZone;

pub trait HasBaseColumns: sea_orm::EntityTrait {
    fn id_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
}
