use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use url::form_urlencoded;

use super::next_url::{RECIPES_HOME, after_login};
use crate::{
    auth::{CurrentUser, MaybeUser},
    db::entities::user,
    forms::{FormErrors, LoginForm, PasswordResetForm, SetPasswordForm, SignupForm},
    response::{PageResult, render},
    services::ServiceContext,
    state::AppState,
};

pub const PASSWORD_RESET_DONE: &str = "/accounts/password_reset/done/";
pub const PASSWORD_RESET_COMPLETE: &str = "/accounts/reset/done/";

#[derive(Template)]
#[template(path = "registration/signup.html")]
struct SignupTemplate {
    current_user: Option<String>,
    form: SignupForm,
    errors: FormErrors,
}

#[derive(Template)]
#[template(path = "registration/login.html")]
struct LoginTemplate {
    current_user: Option<String>,
    username: String,
    next: String,
    errors: FormErrors,
}

#[derive(Template)]
#[template(path = "registration/user_detail.html")]
struct UserDetailTemplate {
    current_user: Option<String>,
    user: user::Model,
    num_recipes: u64,
    num_favorites: u64,
}

#[derive(Template)]
#[template(path = "registration/password_reset_form.html")]
struct PasswordResetFormTemplate {
    current_user: Option<String>,
    email: String,
    errors: FormErrors,
}

#[derive(Template)]
#[template(path = "registration/password_reset_done.html")]
struct PasswordResetDoneTemplate {
    current_user: Option<String>,
}

#[derive(Template)]
#[template(path = "registration/password_reset_confirm.html")]
struct PasswordResetConfirmTemplate {
    current_user: Option<String>,
    valid_link: bool,
    errors: FormErrors,
}

#[derive(Template)]
#[template(path = "registration/password_reset_complete.html")]
struct PasswordResetCompleteTemplate {
    current_user: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NextQuery {
    next: Option<String>,
}

/// Usernames may hold non-ASCII letters, so the segment is percent-encoded.
pub fn user_detail_path(username: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(username.as_bytes()).collect();
    format!("/accounts/users/{encoded}")
}

fn username_of(viewer: &MaybeUser) -> Option<String> {
    viewer.0.as_ref().map(|user| user.username.clone())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/accounts/signup/", get(signup_page).post(signup_submit))
        .route("/accounts/login/", get(login_page).post(login_submit))
        .route("/accounts/logout/", post(logout))
        .route("/accounts/users/{username}", get(user_detail))
        .route(
            "/accounts/password_reset/",
            get(password_reset_page).post(password_reset_submit),
        )
        .route(PASSWORD_RESET_DONE, get(password_reset_done))
        .route(
            "/accounts/reset/{uid}/{token}/",
            get(password_reset_confirm_page).post(password_reset_confirm_submit),
        )
        .route(PASSWORD_RESET_COMPLETE, get(password_reset_complete))
        .with_state(state)
}

async fn signup_page(viewer: MaybeUser) -> PageResult {
    render(&SignupTemplate {
        current_user: username_of(&viewer),
        form: SignupForm::default(),
        errors: FormErrors::new(),
    })
}

async fn signup_submit(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> PageResult {
    let services = ServiceContext::from_state(&state);
    match services.accounts(&state).signup(&form).await? {
        Ok(created) => {
            let token = state.session.issue(&created)?;
            let jar = jar.add(state.session.login_cookie(token));
            let target = user_detail_path(&created.username);
            Ok((jar, Redirect::to(&target)).into_response())
        }
        Err(errors) => render(&SignupTemplate {
            current_user: username_of(&viewer),
            form: SignupForm {
                password1: String::new(),
                password2: String::new(),
                ..form
            },
            errors,
        }),
    }
}

async fn login_page(viewer: MaybeUser, Query(query): Query<NextQuery>) -> PageResult {
    render(&LoginTemplate {
        current_user: username_of(&viewer),
        username: String::new(),
        next: query.next.unwrap_or_default(),
        errors: FormErrors::new(),
    })
}

async fn login_submit(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> PageResult {
    let services = ServiceContext::from_state(&state);
    match services.accounts(&state).authenticate(&form).await? {
        Ok(account) => {
            let token = state.session.issue(&account)?;
            let jar = jar.add(state.session.login_cookie(token));
            let target = after_login(form.next.as_deref());
            Ok((jar, Redirect::to(&target)).into_response())
        }
        Err(errors) => render(&LoginTemplate {
            current_user: username_of(&viewer),
            username: form.username,
            next: form.next.unwrap_or_default(),
            errors,
        }),
    }
}

async fn logout(State(state): State<Arc<AppState>>, viewer: MaybeUser, jar: CookieJar) -> PageResult {
    if let Some(user) = &viewer.0 {
        tracing::info!(user = %user.username, "logged out");
    }
    let jar = jar.remove(state.session.logout_cookie());
    Ok((jar, Redirect::to(RECIPES_HOME)).into_response())
}

/// The path segment is only decoration; the page always shows the viewer.
async fn user_detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(_username): Path<String>,
) -> PageResult {
    let recipes = ServiceContext::from_state(&state).recipes();
    let num_recipes = recipes.count_authored(user.id).await?;
    let num_favorites = recipes.count_favorites(user.id).await?;
    render(&UserDetailTemplate {
        current_user: Some(user.username.clone()),
        user,
        num_recipes,
        num_favorites,
    })
}

async fn password_reset_page(viewer: MaybeUser) -> PageResult {
    render(&PasswordResetFormTemplate {
        current_user: username_of(&viewer),
        email: String::new(),
        errors: FormErrors::new(),
    })
}

async fn password_reset_submit(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
    Form(form): Form<PasswordResetForm>,
) -> PageResult {
    let email = match form.clean() {
        Ok(email) => email,
        Err(errors) => {
            return render(&PasswordResetFormTemplate {
                current_user: username_of(&viewer),
                email: form.email,
                errors,
            });
        }
    };

    let services = ServiceContext::from_state(&state);
    let sent = services.accounts(&state).request_password_reset(&email).await?;
    tracing::debug!(sent, "password reset requested");
    Ok(Redirect::to(PASSWORD_RESET_DONE).into_response())
}

async fn password_reset_done(viewer: MaybeUser) -> PageResult {
    render(&PasswordResetDoneTemplate {
        current_user: username_of(&viewer),
    })
}

async fn password_reset_confirm_page(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
    Path((uid, token)): Path<(String, String)>,
) -> PageResult {
    let services = ServiceContext::from_state(&state);
    let target = services.accounts(&state).reset_target(&uid, &token).await?;
    render(&PasswordResetConfirmTemplate {
        current_user: username_of(&viewer),
        valid_link: target.is_some(),
        errors: FormErrors::new(),
    })
}

async fn password_reset_confirm_submit(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
    Path((uid, token)): Path<(String, String)>,
    Form(form): Form<SetPasswordForm>,
) -> PageResult {
    let services = ServiceContext::from_state(&state);
    let accounts = services.accounts(&state);
    let Some(account) = accounts.reset_target(&uid, &token).await? else {
        return render(&PasswordResetConfirmTemplate {
            current_user: username_of(&viewer),
            valid_link: false,
            errors: FormErrors::new(),
        });
    };

    match accounts.set_password(&account, &form).await? {
        Ok(()) => Ok(Redirect::to(PASSWORD_RESET_COMPLETE).into_response()),
        Err(errors) => render(&PasswordResetConfirmTemplate {
            current_user: username_of(&viewer),
            valid_link: true,
            errors,
        }),
    }
}

async fn password_reset_complete(viewer: MaybeUser) -> PageResult {
    render(&PasswordResetCompleteTemplate {
        current_user: username_of(&viewer),
    })
}

#[cfg(test)]
mod tests {
    use super::user_detail_path;

    #[test]
    fn user_detail_path_is_ascii() {
        assert_eq!(user_detail_path("julia"), "/accounts/users/julia");
        assert_eq!(user_detail_path("josé"), "/accounts/users/jos%C3%A9");
        assert_eq!(user_detail_path("a+b@c"), "/accounts/users/a%2Bb%40c");
    }
}
