use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use serde::Deserialize;

use super::next_url::{after_recipe_change, recipe_detail_path};
use crate::{
    auth::{CurrentUser, MaybeUser},
    db::entities::{ingredient, instruction, recipe},
    forms::{FormErrors, IngredientForm, InstructionForm, RecipeForm},
    response::{PageResult, render},
    services::{
        Page, PageRequest, ServiceContext,
        recipe_service::{FavoriteAction, RecipeDetail, parse_id},
    },
    state::AppState,
};

pub const MY_RECIPES: &str = "/recipes/my-recipes/";

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    current_user: Option<String>,
    num_recipes: u64,
    newest_recipes: Vec<recipe::Model>,
}

#[derive(Template)]
#[template(path = "recipes/recipe_list.html")]
struct RecipeListTemplate {
    current_user: Option<String>,
    page: Page<recipe::Model>,
}

#[derive(Template)]
#[template(path = "recipes/my_recipes_list.html")]
struct MyRecipesTemplate {
    current_user: Option<String>,
    page: Page<recipe::Model>,
}

#[derive(Template)]
#[template(path = "recipes/my_favorites_list.html")]
struct MyFavoritesTemplate {
    current_user: Option<String>,
    page: Page<recipe::Model>,
}

#[derive(Template)]
#[template(path = "recipes/recipe_detail.html")]
struct RecipeDetailTemplate {
    current_user: Option<String>,
    detail: RecipeDetail,
    is_author: bool,
    back_here: String,
}

#[derive(Template)]
#[template(path = "recipes/recipe_form.html")]
struct RecipeFormTemplate {
    current_user: Option<String>,
    recipe: Option<recipe::Model>,
    form: RecipeForm,
    errors: FormErrors,
}

#[derive(Template)]
#[template(path = "recipes/ingredient_form.html")]
struct IngredientFormTemplate {
    current_user: Option<String>,
    recipe: recipe::Model,
    editing: bool,
    existing: Vec<ingredient::Model>,
    form: IngredientForm,
    errors: FormErrors,
}

#[derive(Template)]
#[template(path = "recipes/instruction_form.html")]
struct InstructionFormTemplate {
    current_user: Option<String>,
    recipe: recipe::Model,
    editing: bool,
    existing: Vec<instruction::Model>,
    form: InstructionForm,
    errors: FormErrors,
}

#[derive(Template)]
#[template(path = "recipes/recipe_confirm_delete.html")]
struct RecipeConfirmDeleteTemplate {
    current_user: Option<String>,
    recipe: recipe::Model,
}

#[derive(Template)]
#[template(path = "recipes/ingredient_confirm_delete.html")]
struct IngredientConfirmDeleteTemplate {
    current_user: Option<String>,
    recipe: recipe::Model,
    ingredient: ingredient::Model,
}

#[derive(Template)]
#[template(path = "recipes/instruction_confirm_delete.html")]
struct InstructionConfirmDeleteTemplate {
    current_user: Option<String>,
    recipe: recipe::Model,
    instruction: instruction::Model,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NextQuery {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FavoriteForm {
    action: String,
    next: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/recipes/", get(index))
        .route("/recipes/all/", get(all_recipes))
        .route("/recipes/my-recipes/", get(my_recipes))
        .route("/recipes/my-favorites/", get(my_favorites))
        .route("/recipes/{id}", get(recipe_detail))
        .route("/recipes/{id}/favorite", post(toggle_favorite))
        .route("/recipes/submit/create/", get(create_recipe_page).post(create_recipe_submit))
        .route(
            "/recipes/submit/{id}/add-ingredient",
            get(add_ingredient_page).post(add_ingredient_submit),
        )
        .route(
            "/recipes/submit/{id}/add-instruction",
            get(add_instruction_page).post(add_instruction_submit),
        )
        .route(
            "/recipes/submit/{id}/update_recipe",
            get(update_recipe_page).post(update_recipe_submit),
        )
        .route(
            "/recipes/submit/{id}/update_ingredient",
            get(update_ingredient_page).post(update_ingredient_submit),
        )
        .route(
            "/recipes/submit/{id}/update_instruction",
            get(update_instruction_page).post(update_instruction_submit),
        )
        .route(
            "/recipes/recipe/{id}/delete",
            get(delete_recipe_page).post(delete_recipe_submit),
        )
        .route(
            "/recipes/submit/{id}/delete_ingredient",
            get(delete_ingredient_page).post(delete_ingredient_submit),
        )
        .route(
            "/recipes/submit/{id}/delete_instruction",
            get(delete_instruction_page).post(delete_instruction_submit),
        )
        .with_state(state)
}

fn username_of(viewer: &MaybeUser) -> Option<String> {
    viewer.0.as_ref().map(|user| user.username.clone())
}

fn see_other(target: &str) -> PageResult {
    Ok(Redirect::to(target).into_response())
}

fn add_ingredient_path(recipe_id: uuid::Uuid) -> String {
    format!("/recipes/submit/{recipe_id}/add-ingredient")
}

fn add_instruction_path(recipe_id: uuid::Uuid) -> String {
    format!("/recipes/submit/{recipe_id}/add-instruction")
}

async fn index(State(state): State<Arc<AppState>>, viewer: MaybeUser) -> PageResult {
    let summary = ServiceContext::from_state(&state).recipes().home().await?;
    render(&IndexTemplate {
        current_user: username_of(&viewer),
        num_recipes: summary.num_recipes,
        newest_recipes: summary.newest,
    })
}

async fn all_recipes(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
    Query(query): Query<ListQuery>,
) -> PageResult {
    let request = PageRequest::parse(query.page.as_deref())?;
    let page = ServiceContext::from_state(&state)
        .recipes()
        .list_all(request)
        .await?;
    render(&RecipeListTemplate {
        current_user: username_of(&viewer),
        page,
    })
}

async fn my_recipes(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> PageResult {
    let request = PageRequest::parse(query.page.as_deref())?;
    let page = ServiceContext::from_state(&state)
        .recipes()
        .list_authored(user.id, request)
        .await?;
    render(&MyRecipesTemplate {
        current_user: Some(user.username),
        page,
    })
}

async fn my_favorites(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> PageResult {
    let request = PageRequest::parse(query.page.as_deref())?;
    let page = ServiceContext::from_state(&state)
        .recipes()
        .list_favorites(user.id, request)
        .await?;
    render(&MyFavoritesTemplate {
        current_user: Some(user.username),
        page,
    })
}

async fn recipe_detail(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
    Path(id): Path<String>,
) -> PageResult {
    let id = parse_id(&id)?;
    let detail = ServiceContext::from_state(&state)
        .recipes()
        .detail(id, viewer.id())
        .await?;
    let is_author = viewer
        .0
        .as_ref()
        .is_some_and(|user| detail.recipe.is_authored_by(&user.id));
    render(&RecipeDetailTemplate {
        current_user: username_of(&viewer),
        back_here: recipe_detail_path(detail.recipe.id),
        is_author,
        detail,
    })
}

async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<FavoriteForm>,
) -> PageResult {
    let id = parse_id(&id)?;
    let action = FavoriteAction::parse(&form.action)?;
    ServiceContext::from_state(&state)
        .recipes()
        .set_favorite(&user, id, action)
        .await?;
    see_other(&after_recipe_change(form.next.as_deref(), id))
}

async fn create_recipe_page(CurrentUser(user): CurrentUser) -> PageResult {
    render(&RecipeFormTemplate {
        current_user: Some(user.username),
        recipe: None,
        form: RecipeForm::default(),
        errors: FormErrors::new(),
    })
}

async fn create_recipe_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<RecipeForm>,
) -> PageResult {
    let fields = match form.clean() {
        Ok(fields) => fields,
        Err(errors) => {
            return render(&RecipeFormTemplate {
                current_user: Some(user.username),
                recipe: None,
                form,
                errors,
            });
        }
    };
    let created = ServiceContext::from_state(&state)
        .recipes()
        .create_recipe(&user, fields)
        .await?;
    see_other(&add_ingredient_path(created.id))
}

async fn add_ingredient_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let recipe = recipes.require_own_recipe(&user, parse_id(&id)?).await?;
    let detail = recipes.detail(recipe.id, Some(user.id)).await?;
    render(&IngredientFormTemplate {
        current_user: Some(user.username),
        recipe,
        editing: false,
        existing: detail.ingredients,
        form: IngredientForm::default(),
        errors: FormErrors::new(),
    })
}

async fn add_ingredient_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<IngredientForm>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let recipe = recipes.require_own_recipe(&user, parse_id(&id)?).await?;
    match form.clean() {
        Ok(fields) => {
            recipes.add_ingredient(&recipe, fields).await?;
            see_other(&add_ingredient_path(recipe.id))
        }
        Err(errors) => {
            let detail = recipes.detail(recipe.id, Some(user.id)).await?;
            render(&IngredientFormTemplate {
                current_user: Some(user.username),
                recipe,
                editing: false,
                existing: detail.ingredients,
                form,
                errors,
            })
        }
    }
}

async fn add_instruction_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let recipe = recipes.require_own_recipe(&user, parse_id(&id)?).await?;
    let detail = recipes.detail(recipe.id, Some(user.id)).await?;
    render(&InstructionFormTemplate {
        current_user: Some(user.username),
        recipe,
        editing: false,
        existing: detail.instructions,
        form: InstructionForm::default(),
        errors: FormErrors::new(),
    })
}

async fn add_instruction_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<InstructionForm>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let recipe = recipes.require_own_recipe(&user, parse_id(&id)?).await?;
    match form.clean() {
        Ok(fields) => {
            recipes.add_instruction(&recipe, fields).await?;
            see_other(&add_instruction_path(recipe.id))
        }
        Err(errors) => {
            let detail = recipes.detail(recipe.id, Some(user.id)).await?;
            render(&InstructionFormTemplate {
                current_user: Some(user.username),
                recipe,
                editing: false,
                existing: detail.instructions,
                form,
                errors,
            })
        }
    }
}

async fn update_recipe_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> PageResult {
    let recipe = ServiceContext::from_state(&state)
        .recipes()
        .require_own_recipe(&user, parse_id(&id)?)
        .await?;
    render(&RecipeFormTemplate {
        current_user: Some(user.username),
        form: RecipeForm::from_model(&recipe),
        recipe: Some(recipe),
        errors: FormErrors::new(),
    })
}

async fn update_recipe_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<NextQuery>,
    Form(form): Form<RecipeForm>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let recipe = recipes.require_own_recipe(&user, parse_id(&id)?).await?;
    match form.clean() {
        Ok(fields) => {
            let updated = recipes.update_recipe(&recipe, fields).await?;
            see_other(&after_recipe_change(query.next.as_deref(), updated.id))
        }
        Err(errors) => render(&RecipeFormTemplate {
            current_user: Some(user.username),
            recipe: Some(recipe),
            form,
            errors,
        }),
    }
}

async fn update_ingredient_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> PageResult {
    let (ingredient, recipe) = ServiceContext::from_state(&state)
        .recipes()
        .require_own_ingredient(&user, parse_id(&id)?)
        .await?;
    render(&IngredientFormTemplate {
        current_user: Some(user.username),
        recipe,
        editing: true,
        existing: Vec::new(),
        form: IngredientForm::from_model(&ingredient),
        errors: FormErrors::new(),
    })
}

async fn update_ingredient_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<NextQuery>,
    Form(form): Form<IngredientForm>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let (ingredient, recipe) = recipes.require_own_ingredient(&user, parse_id(&id)?).await?;
    match form.clean() {
        Ok(fields) => {
            recipes.update_ingredient(&ingredient, fields).await?;
            see_other(&after_recipe_change(query.next.as_deref(), recipe.id))
        }
        Err(errors) => render(&IngredientFormTemplate {
            current_user: Some(user.username),
            recipe,
            editing: true,
            existing: Vec::new(),
            form,
            errors,
        }),
    }
}

async fn update_instruction_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> PageResult {
    let (instruction, recipe) = ServiceContext::from_state(&state)
        .recipes()
        .require_own_instruction(&user, parse_id(&id)?)
        .await?;
    render(&InstructionFormTemplate {
        current_user: Some(user.username),
        recipe,
        editing: true,
        existing: Vec::new(),
        form: InstructionForm::from_model(&instruction),
        errors: FormErrors::new(),
    })
}

async fn update_instruction_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<NextQuery>,
    Form(form): Form<InstructionForm>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let (instruction, recipe) = recipes.require_own_instruction(&user, parse_id(&id)?).await?;
    match form.clean() {
        Ok(fields) => {
            recipes.update_instruction(&instruction, fields).await?;
            see_other(&after_recipe_change(query.next.as_deref(), recipe.id))
        }
        Err(errors) => render(&InstructionFormTemplate {
            current_user: Some(user.username),
            recipe,
            editing: true,
            existing: Vec::new(),
            form,
            errors,
        }),
    }
}

async fn delete_recipe_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> PageResult {
    let recipe = ServiceContext::from_state(&state)
        .recipes()
        .require_own_recipe(&user, parse_id(&id)?)
        .await?;
    render(&RecipeConfirmDeleteTemplate {
        current_user: Some(user.username),
        recipe,
    })
}

async fn delete_recipe_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let recipe = recipes.require_own_recipe(&user, parse_id(&id)?).await?;
    recipes.delete_recipe(&recipe).await?;
    see_other(MY_RECIPES)
}

async fn delete_ingredient_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> PageResult {
    let (ingredient, recipe) = ServiceContext::from_state(&state)
        .recipes()
        .require_own_ingredient(&user, parse_id(&id)?)
        .await?;
    render(&IngredientConfirmDeleteTemplate {
        current_user: Some(user.username),
        recipe,
        ingredient,
    })
}

async fn delete_ingredient_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<NextQuery>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let (ingredient, recipe) = recipes.require_own_ingredient(&user, parse_id(&id)?).await?;
    recipes.delete_ingredient(&ingredient).await?;
    see_other(&after_recipe_change(query.next.as_deref(), recipe.id))
}

async fn delete_instruction_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> PageResult {
    let (instruction, recipe) = ServiceContext::from_state(&state)
        .recipes()
        .require_own_instruction(&user, parse_id(&id)?)
        .await?;
    render(&InstructionConfirmDeleteTemplate {
        current_user: Some(user.username),
        recipe,
        instruction,
    })
}

async fn delete_instruction_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<NextQuery>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let (instruction, recipe) = recipes.require_own_instruction(&user, parse_id(&id)?).await?;
    recipes.delete_instruction(&instruction).await?;
    see_other(&after_recipe_change(query.next.as_deref(), recipe.id))
}
