use sea_orm::DatabaseConnection;

use crate::{
    db::dao::DaoContext,
    services::{account_service::AccountService, recipe_service::RecipeService},
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn recipes(&self) -> RecipeService {
        RecipeService::new(
            self.daos.user(),
            self.daos.recipe(),
            self.daos.ingredient(),
            self.daos.instruction(),
            self.daos.favorite(),
        )
    }

    pub fn accounts<'a>(&self, state: &'a AppState) -> AccountService<'a> {
        AccountService::new(
            self.daos.user(),
            state.mailer.as_ref(),
            &state.config.auth.session_secret,
            state.config.public_url(),
        )
    }
}
