use serde::Deserialize;

use super::{FormErrors, optional_text, positive_integer, required_text};
use crate::db::{
    dao::{ingredient_dao::IngredientFields, instruction_dao::InstructionFields, recipe_dao::RecipeFields},
    entities::{ingredient, instruction, recipe},
};

pub const RECIPE_NAME_MAX_LEN: usize = 200;
pub const INGREDIENT_NAME_MAX_LEN: usize = 100;
pub const INGREDIENT_AMOUNT_MAX_LEN: usize = 20;
pub const INGREDIENT_PREPARATION_MAX_LEN: usize = 100;

pub const RECIPE_NAME_HELP: &str = "Enter a name for this recipe";
pub const RECIPE_SERVINGS_HELP: &str = "Enter the number of servings this recipe makes";
pub const RECIPE_NOTES_HELP: &str = "Add any useful notes, hints or advice for this recipe";
pub const INGREDIENT_NAME_HELP: &str = "Enter the name of an ingredient (e.g. garlic)";
pub const INGREDIENT_AMOUNT_HELP: &str = "Enter the amount to use (e.g. 1/4 tsp.)";
pub const INGREDIENT_PREPARATION_HELP: &str =
    "Describe this ingredient's preparation (e.g. finely minced) or leave blank";
pub const INSTRUCTION_DESCRIPTION_HELP: &str = "Add a step to the recipe's instructions";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipeForm {
    pub name: String,
    pub description: String,
    pub servings: String,
    pub notes: String,
}

impl RecipeForm {
    pub fn from_model(model: &recipe::Model) -> Self {
        Self {
            name: model.name.clone(),
            description: model.description.clone(),
            servings: model.servings.to_string(),
            notes: model.notes.clone().unwrap_or_default(),
        }
    }

    pub fn clean(&self) -> Result<RecipeFields, FormErrors> {
        let mut errors = FormErrors::new();
        let fields = RecipeFields {
            name: required_text(&mut errors, "name", &self.name, RECIPE_NAME_MAX_LEN),
            description: self.description.trim().to_string(),
            servings: positive_integer(&mut errors, "servings", &self.servings),
            notes: optional_text(&mut errors, "notes", &self.notes, None),
        };
        errors.into_result(fields)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngredientForm {
    pub name: String,
    pub amount: String,
    pub preparation: String,
}

impl IngredientForm {
    pub fn from_model(model: &ingredient::Model) -> Self {
        Self {
            name: model.name.clone(),
            amount: model.amount.clone(),
            preparation: model.preparation.clone().unwrap_or_default(),
        }
    }

    pub fn clean(&self) -> Result<IngredientFields, FormErrors> {
        let mut errors = FormErrors::new();
        let fields = IngredientFields {
            name: required_text(&mut errors, "name", &self.name, INGREDIENT_NAME_MAX_LEN),
            amount: required_text(&mut errors, "amount", &self.amount, INGREDIENT_AMOUNT_MAX_LEN),
            preparation: optional_text(
                &mut errors,
                "preparation",
                &self.preparation,
                Some(INGREDIENT_PREPARATION_MAX_LEN),
            ),
        };
        errors.into_result(fields)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstructionForm {
    pub step_number: String,
    pub description: String,
}

impl InstructionForm {
    pub fn from_model(model: &instruction::Model) -> Self {
        Self {
            step_number: model.step_number.to_string(),
            description: model.description.clone(),
        }
    }

    pub fn clean(&self) -> Result<InstructionFields, FormErrors> {
        let mut errors = FormErrors::new();
        let fields = InstructionFields {
            step_number: positive_integer(&mut errors, "step_number", &self.step_number),
            description: required_text(&mut errors, "description", &self.description, usize::MAX),
        };
        errors.into_result(fields)
    }
}
