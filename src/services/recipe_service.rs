use uuid::Uuid;

use super::pagination::{PAGE_SIZE, Page, PageRequest};
use crate::{
    db::{
        dao::{
            DaoBase, DaoLayerError, FavoriteDao, IngredientDao, InstructionDao, RecipeDao, UserDao,
            ingredient_dao::IngredientFields, instruction_dao::InstructionFields,
            recipe_dao::RecipeFields,
        },
        entities::{ingredient, instruction, recipe, user},
    },
    error::AppError,
};

pub const HOME_RECIPE_COUNT: u64 = 10;

/// Path segments that are not UUIDs simply name nothing.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(format!("No object with id {raw}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    Favorite,
    Remove,
}

impl FavoriteAction {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "favorite" => Ok(Self::Favorite),
            "remove" => Ok(Self::Remove),
            other => Err(AppError::bad_request(format!("Unknown favorite action '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecipeDetail {
    pub recipe: recipe::Model,
    pub author: Option<user::Model>,
    pub ingredients: Vec<ingredient::Model>,
    pub instructions: Vec<instruction::Model>,
    pub is_favorite: bool,
}

#[derive(Debug, Clone)]
pub struct HomeSummary {
    pub num_recipes: u64,
    pub newest: Vec<recipe::Model>,
}

#[derive(Clone)]
pub struct RecipeService {
    users: UserDao,
    recipes: RecipeDao,
    ingredients: IngredientDao,
    instructions: InstructionDao,
    favorites: FavoriteDao,
}

fn ensure_author(user: &user::Model, recipe: &recipe::Model) -> Result<(), AppError> {
    if recipe.is_authored_by(&user.id) {
        Ok(())
    } else {
        Err(AppError::forbidden("Only the author may change this recipe"))
    }
}

impl RecipeService {
    pub fn new(
        users: UserDao,
        recipes: RecipeDao,
        ingredients: IngredientDao,
        instructions: InstructionDao,
        favorites: FavoriteDao,
    ) -> Self {
        Self {
            users,
            recipes,
            ingredients,
            instructions,
            favorites,
        }
    }

    pub async fn home(&self) -> Result<HomeSummary, AppError> {
        Ok(HomeSummary {
            num_recipes: self.recipes.count_all().await?,
            newest: self.recipes.newest(HOME_RECIPE_COUNT).await?,
        })
    }

    pub async fn list_all(&self, request: PageRequest) -> Result<Page<recipe::Model>, AppError> {
        let total = self.recipes.count_all().await?;
        Page::fetch(request, total, |number| {
            self.recipes.page_by_name(number, PAGE_SIZE)
        })
        .await
    }

    pub async fn list_authored(
        &self,
        user_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<recipe::Model>, AppError> {
        let total = self.recipes.count_by_author(user_id).await?;
        Page::fetch(request, total, |number| {
            self.recipes.page_by_author(user_id, number, PAGE_SIZE)
        })
        .await
    }

    pub async fn list_favorites(
        &self,
        user_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<recipe::Model>, AppError> {
        let total = self.recipes.count_favorites_of(user_id).await?;
        Page::fetch(request, total, |number| {
            self.recipes.page_favorites_of(user_id, number, PAGE_SIZE)
        })
        .await
    }

    pub async fn count_authored(&self, user_id: Uuid) -> Result<u64, AppError> {
        Ok(self.recipes.count_by_author(user_id).await?)
    }

    pub async fn count_favorites(&self, user_id: Uuid) -> Result<u64, AppError> {
        Ok(self.favorites.count_for_user(user_id).await?)
    }

    pub async fn find_recipe(&self, id: Uuid) -> Result<recipe::Model, AppError> {
        Ok(self.recipes.find_by_id(id).await?)
    }

    pub async fn detail(&self, id: Uuid, viewer: Option<Uuid>) -> Result<RecipeDetail, AppError> {
        let recipe = self.recipes.find_by_id(id).await?;
        let author = match recipe.author_id {
            Some(author_id) => match self.users.find_by_id(author_id).await {
                Ok(author) => Some(author),
                Err(DaoLayerError::NotFound { .. }) => None,
                Err(err) => return Err(err.into()),
            },
            None => None,
        };
        let is_favorite = match viewer {
            Some(user_id) => self.favorites.is_favorite(user_id, recipe.id).await?,
            None => false,
        };

        Ok(RecipeDetail {
            ingredients: self.ingredients.list_for_recipe(recipe.id).await?,
            instructions: self.instructions.list_for_recipe(recipe.id).await?,
            recipe,
            author,
            is_favorite,
        })
    }

    pub async fn set_favorite(
        &self,
        user: &user::Model,
        recipe_id: Uuid,
        action: FavoriteAction,
    ) -> Result<(), AppError> {
        let recipe = self.recipes.find_by_id(recipe_id).await?;
        match action {
            FavoriteAction::Favorite => {
                if self.favorites.add(user.id, recipe.id).await? {
                    tracing::info!(user = %user.username, recipe_id = %recipe.id, "favorite added");
                }
            }
            FavoriteAction::Remove => {
                if self.favorites.remove(user.id, recipe.id).await? {
                    tracing::info!(user = %user.username, recipe_id = %recipe.id, "favorite removed");
                }
            }
        }
        Ok(())
    }

    pub async fn create_recipe(
        &self,
        author: &user::Model,
        fields: RecipeFields,
    ) -> Result<recipe::Model, AppError> {
        let recipe = self.recipes.create_recipe(author.id, fields).await?;
        tracing::info!(author = %author.username, recipe_id = %recipe.id, "recipe created");
        Ok(recipe)
    }

    /// Loads a recipe the user may edit: not found before forbidden.
    pub async fn require_own_recipe(
        &self,
        user: &user::Model,
        id: Uuid,
    ) -> Result<recipe::Model, AppError> {
        let recipe = self.recipes.find_by_id(id).await?;
        ensure_author(user, &recipe)?;
        Ok(recipe)
    }

    pub async fn require_own_ingredient(
        &self,
        user: &user::Model,
        id: Uuid,
    ) -> Result<(ingredient::Model, recipe::Model), AppError> {
        let ingredient = self.ingredients.find_by_id(id).await?;
        let recipe = self.require_own_recipe(user, ingredient.recipe_id).await?;
        Ok((ingredient, recipe))
    }

    pub async fn require_own_instruction(
        &self,
        user: &user::Model,
        id: Uuid,
    ) -> Result<(instruction::Model, recipe::Model), AppError> {
        let instruction = self.instructions.find_by_id(id).await?;
        let recipe = self.require_own_recipe(user, instruction.recipe_id).await?;
        Ok((instruction, recipe))
    }

    pub async fn update_recipe(
        &self,
        recipe: &recipe::Model,
        fields: RecipeFields,
    ) -> Result<recipe::Model, AppError> {
        let updated = self.recipes.update_recipe(recipe.id, fields).await?;
        tracing::info!(recipe_id = %updated.id, "recipe updated");
        Ok(updated)
    }

    pub async fn delete_recipe(&self, recipe: &recipe::Model) -> Result<(), AppError> {
        self.recipes.delete(recipe.id).await?;
        tracing::info!(recipe_id = %recipe.id, name = %recipe.name, "recipe deleted");
        Ok(())
    }

    pub async fn add_ingredient(
        &self,
        recipe: &recipe::Model,
        fields: IngredientFields,
    ) -> Result<ingredient::Model, AppError> {
        let ingredient = self.ingredients.create_ingredient(recipe.id, fields).await?;
        tracing::debug!(recipe_id = %recipe.id, ingredient_id = %ingredient.id, "ingredient added");
        Ok(ingredient)
    }

    pub async fn update_ingredient(
        &self,
        ingredient: &ingredient::Model,
        fields: IngredientFields,
    ) -> Result<ingredient::Model, AppError> {
        Ok(self.ingredients.update_ingredient(ingredient.id, fields).await?)
    }

    pub async fn delete_ingredient(&self, ingredient: &ingredient::Model) -> Result<(), AppError> {
        self.ingredients.delete(ingredient.id).await?;
        tracing::debug!(ingredient_id = %ingredient.id, "ingredient deleted");
        Ok(())
    }

    pub async fn add_instruction(
        &self,
        recipe: &recipe::Model,
        fields: InstructionFields,
    ) -> Result<instruction::Model, AppError> {
        let instruction = self.instructions.create_instruction(recipe.id, fields).await?;
        tracing::debug!(recipe_id = %recipe.id, instruction_id = %instruction.id, "instruction added");
        Ok(instruction)
    }

    pub async fn update_instruction(
        &self,
        instruction: &instruction::Model,
        fields: InstructionFields,
    ) -> Result<instruction::Model, AppError> {
        Ok(self
            .instructions
            .update_instruction(instruction.id, fields)
            .await?)
    }

    pub async fn delete_instruction(
        &self,
        instruction: &instruction::Model,
    ) -> Result<(), AppError> {
        self.instructions.delete(instruction.id).await?;
        tracing::debug!(instruction_id = %instruction.id, "instruction deleted");
        Ok(())
    }
}
