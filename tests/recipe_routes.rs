use axum::http::StatusCode;

use recipe_box::{
    db::{
        dao::{DaoBase, DaoContext, ingredient_dao::IngredientFields, recipe_dao::RecipeFields},
        entities::{recipe, user},
    },
    test_helpers::{TestApp, body_text, location},
};

fn fields(name: &str) -> RecipeFields {
    RecipeFields {
        name: name.to_string(),
        description: format!("How to make {name}"),
        servings: 2,
        notes: None,
    }
}

async fn seed_recipe(app: &TestApp, author: &user::Model, name: &str) -> recipe::Model {
    app.services()
        .recipes()
        .create_recipe(author, fields(name))
        .await
        .unwrap()
}

fn listed_recipes(html: &str) -> usize {
    html.matches(r#"<li><a href="/recipes/"#).count()
}

#[tokio::test]
async fn index_counts_recipes_for_anonymous_visitors() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    seed_recipe(&app, &cook, "Bread").await;
    seed_recipe(&app, &cook, "Soup").await;

    let response = app.get("/recipes/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"data-template="index.html""#));
    assert!(html.contains("The box holds 2 recipes."));
    assert_eq!(listed_recipes(&html), 2);
}

#[tokio::test]
async fn index_lists_the_ten_newest_recipes_first() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    for n in 0..15 {
        seed_recipe(&app, &cook, &format!("Recipe {n:02}")).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let html = body_text(app.get("/recipes/", None).await).await;
    assert!(html.contains("The box holds 15 recipes."));
    assert_eq!(listed_recipes(&html), 10);

    let positions: Vec<usize> = (5..15)
        .rev()
        .map(|n| html.find(&format!("Recipe {n:02}")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    for n in 0..5 {
        assert!(!html.contains(&format!("Recipe {n:02}")));
    }
}

#[tokio::test]
async fn deleting_the_author_keeps_the_recipe() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    let recipe = seed_recipe(&app, &cook, "Orphaned stew").await;

    let daos = DaoContext::new(app.db());
    daos.user().delete(cook.id).await.unwrap();

    let kept = daos.recipe().find_by_id(recipe.id).await.unwrap();
    assert_eq!(kept.author_id, None);

    let response = app.get(&format!("/recipes/{}", recipe.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Orphaned stew"));
    assert!(html.contains("by a former member"));
}

#[tokio::test]
async fn root_redirects_to_the_recipe_home() {
    let app = TestApp::spawn().await.unwrap();

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/recipes/"));
}

#[tokio::test]
async fn all_recipes_paginate_by_ten() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    for n in 0..15 {
        seed_recipe(&app, &cook, &format!("Recipe {n:02}")).await;
    }

    let first = body_text(app.get("/recipes/all/", None).await).await;
    assert!(first.contains(r#"data-template="recipes/recipe_list.html""#));
    assert_eq!(listed_recipes(&first), 10);
    assert!(first.contains("Page 1 of 2."));
    assert!(first.contains("Recipe 00"));
    assert!(!first.contains("Recipe 10"));

    let second = body_text(app.get("/recipes/all/?page=2", None).await).await;
    assert_eq!(listed_recipes(&second), 5);
    assert!(second.contains("Recipe 14"));

    let last = body_text(app.get("/recipes/all/?page=last", None).await).await;
    assert!(last.contains("Page 2 of 2."));

    assert_eq!(
        app.get("/recipes/all/?page=3", None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.get("/recipes/all/?page=abc", None).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn empty_list_still_has_a_first_page() {
    let app = TestApp::spawn().await.unwrap();

    let response = app.get("/recipes/all/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("There are no recipes yet."));
}

#[tokio::test]
async fn personal_lists_require_login() {
    let app = TestApp::spawn().await.unwrap();

    let response = app.get("/recipes/my-recipes/", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        Some("/accounts/login/?next=/recipes/my-recipes/")
    );

    let response = app.get("/recipes/submit/create/", None).await;
    assert_eq!(
        location(&response),
        Some("/accounts/login/?next=/recipes/submit/create/")
    );
}

#[tokio::test]
async fn my_recipes_lists_only_the_viewers_recipes() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    let other = app.create_user("other").await.unwrap();
    seed_recipe(&app, &cook, "Mine").await;
    seed_recipe(&app, &other, "Theirs").await;
    let cookie = app.session_cookie(&cook).unwrap();

    let html = body_text(app.get("/recipes/my-recipes/", Some(&cookie)).await).await;
    assert!(html.contains(r#"data-template="recipes/my_recipes_list.html""#));
    assert!(html.contains("Mine"));
    assert!(!html.contains("Theirs"));
}

#[tokio::test]
async fn creating_a_recipe_chains_into_ingredients_and_instructions() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    let cookie = app.session_cookie(&cook).unwrap();

    let form = app.get("/recipes/submit/create/", Some(&cookie)).await;
    assert!(body_text(form).await.contains(r#"data-template="recipes/recipe_form.html""#));

    let response = app
        .post_form(
            "/recipes/submit/create/",
            Some(&cookie),
            &[
                ("name", "Pancakes"),
                ("description", "Fluffy"),
                ("servings", "4"),
                ("notes", ""),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let add_ingredient = location(&response).unwrap().to_string();
    assert!(add_ingredient.ends_with("/add-ingredient"));

    let response = app
        .post_form(
            &add_ingredient,
            Some(&cookie),
            &[("name", "flour"), ("amount", "2 cups"), ("preparation", "sifted")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some(add_ingredient.as_str()));

    let add_instruction = add_ingredient.replace("add-ingredient", "add-instruction");
    let response = app
        .post_form(
            &add_instruction,
            Some(&cookie),
            &[("step_number", "1"), ("description", "Whisk everything together")],
        )
        .await;
    assert_eq!(location(&response), Some(add_instruction.as_str()));

    let created = DaoContext::new(app.db())
        .recipe()
        .find_all(&[], |query| query)
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].author_id, Some(cook.id));
    assert_eq!(created[0].notes, None);

    let html = body_text(app.get(&format!("/recipes/{}", created[0].id), None).await).await;
    assert!(html.contains(r#"data-template="recipes/recipe_detail.html""#));
    assert!(html.contains("2 cups flour, sifted"));
    assert!(html.contains("Whisk everything together"));
}

#[tokio::test]
async fn invalid_recipe_redisplays_the_form() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    let cookie = app.session_cookie(&cook).unwrap();

    let response = app
        .post_form(
            "/recipes/submit/create/",
            Some(&cookie),
            &[("name", "Pancakes"), ("description", ""), ("servings", "0")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Ensure this value is greater than or equal to 1."));
    assert!(html.contains(r#"value="Pancakes""#));
}

#[tokio::test]
async fn detail_of_unknown_recipe_is_not_found() {
    let app = TestApp::spawn().await.unwrap();

    let missing = app.get(&format!("/recipes/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(body_text(missing).await.contains(r#"data-template="error.html""#));

    assert_eq!(app.get("/recipes/42", None).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_author_may_edit() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    let stranger = app.create_user("stranger").await.unwrap();
    let recipe = seed_recipe(&app, &cook, "Stew").await;
    let cookie = app.session_cookie(&stranger).unwrap();

    let update = format!("/recipes/submit/{}/update_recipe", recipe.id);
    assert_eq!(app.get(&update, Some(&cookie)).await.status(), StatusCode::FORBIDDEN);
    let response = app
        .post_form(&update, Some(&cookie), &[("name", "Hijacked"), ("servings", "1")])
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let delete = format!("/recipes/recipe/{}/delete", recipe.id);
    assert_eq!(
        app.post_form(&delete, Some(&cookie), &[]).await.status(),
        StatusCode::FORBIDDEN
    );

    let unchanged = app.services().recipes().find_recipe(recipe.id).await.unwrap();
    assert_eq!(unchanged.name, "Stew");
}

#[tokio::test]
async fn updates_follow_local_next_and_fall_back_to_detail() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    let recipe = seed_recipe(&app, &cook, "Stew").await;
    let ingredient = app
        .services()
        .recipes()
        .add_ingredient(
            &recipe,
            IngredientFields {
                name: "carrot".to_string(),
                amount: "2".to_string(),
                preparation: None,
            },
        )
        .await
        .unwrap();
    let cookie = app.session_cookie(&cook).unwrap();
    let detail = format!("/recipes/{}", recipe.id);

    let response = app
        .post_form(
            &format!("/recipes/submit/{}/update_ingredient?next={detail}", ingredient.id),
            Some(&cookie),
            &[("name", "carrots"), ("amount", "3"), ("preparation", "diced")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some(detail.as_str()));

    let response = app
        .post_form(
            &format!(
                "/recipes/submit/{}/update_recipe?next=https://elsewhere.example/",
                recipe.id
            ),
            Some(&cookie),
            &[("name", "Winter stew"), ("servings", "6")],
        )
        .await;
    assert_eq!(location(&response), Some(detail.as_str()));

    let html = body_text(app.get(&detail, None).await).await;
    assert!(html.contains("Winter stew"));
    assert!(html.contains("3 carrots, diced"));
}

#[tokio::test]
async fn deleting_a_recipe_removes_its_parts() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    let recipe = seed_recipe(&app, &cook, "Stew").await;
    app.services()
        .recipes()
        .add_ingredient(
            &recipe,
            IngredientFields {
                name: "salt".to_string(),
                amount: "1 tsp.".to_string(),
                preparation: None,
            },
        )
        .await
        .unwrap();
    let cookie = app.session_cookie(&cook).unwrap();
    let delete = format!("/recipes/recipe/{}/delete", recipe.id);

    let confirm = app.get(&delete, Some(&cookie)).await;
    assert!(
        body_text(confirm)
            .await
            .contains(r#"data-template="recipes/recipe_confirm_delete.html""#)
    );

    let response = app.post_form(&delete, Some(&cookie), &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/recipes/my-recipes/"));

    let daos = DaoContext::new(app.db());
    assert_eq!(daos.recipe().count(|query| query).await.unwrap(), 0);
    assert_eq!(daos.ingredient().count(|query| query).await.unwrap(), 0);
}

#[tokio::test]
async fn favorites_can_be_added_and_removed() {
    let app = TestApp::spawn().await.unwrap();
    let cook = app.create_user("cook").await.unwrap();
    let fan = app.create_user("fan").await.unwrap();
    let recipe = seed_recipe(&app, &cook, "Stew").await;
    let cookie = app.session_cookie(&fan).unwrap();
    let favorite = format!("/recipes/{}/favorite", recipe.id);
    let detail = format!("/recipes/{}", recipe.id);

    for _ in 0..2 {
        let response = app
            .post_form(&favorite, Some(&cookie), &[("action", "favorite"), ("next", &detail)])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some(detail.as_str()));
    }
    assert_eq!(app.services().recipes().count_favorites(fan.id).await.unwrap(), 1);

    let html = body_text(app.get("/recipes/my-favorites/", Some(&cookie)).await).await;
    assert!(html.contains(r#"data-template="recipes/my_favorites_list.html""#));
    assert!(html.contains("Stew"));
    let html = body_text(app.get(&detail, Some(&cookie)).await).await;
    assert!(html.contains("Remove from favorites"));

    app.post_form(&favorite, Some(&cookie), &[("action", "remove")])
        .await;
    assert_eq!(app.services().recipes().count_favorites(fan.id).await.unwrap(), 0);

    let response = app
        .post_form(&favorite, Some(&cookie), &[("action", "toggle")])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn static_files_are_served() {
    let app = TestApp::spawn().await.unwrap();

    let response = app.get("/static/style.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
