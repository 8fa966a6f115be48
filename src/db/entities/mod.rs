#[allow(unused_imports)]
pub mod prelude {
    pub use super::favorite::Entity as Favorite;
    pub use super::ingredient::Entity as Ingredient;
    pub use super::instruction::Entity as Instruction;
    pub use super::recipe::Entity as Recipe;
    pub use super::user::Entity as User;
}

pub mod favorite;
pub mod ingredient;
pub mod instruction;
pub mod recipe;
pub mod user;
