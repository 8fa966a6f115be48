use sea_orm::DatabaseConnection;

use super::{DaoBase, FavoriteDao, IngredientDao, InstructionDao, RecipeDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn recipe(&self) -> RecipeDao {
        DaoBase::new(&self.db)
    }

    pub fn ingredient(&self) -> IngredientDao {
        DaoBase::new(&self.db)
    }

    pub fn instruction(&self) -> InstructionDao {
        DaoBase::new(&self.db)
    }

    pub fn favorite(&self) -> FavoriteDao {
        FavoriteDao::new(&self.db)
    }
}
