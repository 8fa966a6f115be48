pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod favorite_dao;
pub mod ingredient_dao;
pub mod instruction_dao;
pub mod recipe_dao;
pub mod user_dao;

pub use base::{DaoBase, PaginatedResponse, SortOrder};
pub use base_traits::{HasBaseColumns, HasIdActiveModel, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use favorite_dao::FavoriteDao;
pub use ingredient_dao::IngredientDao;
pub use instruction_dao::InstructionDao;
pub use recipe_dao::RecipeDao;
pub use user_dao::UserDao;
