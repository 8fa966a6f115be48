use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use url::form_urlencoded;

use super::SESSION_COOKIE;
use crate::{
    db::{
        dao::{DaoBase, DaoContext, DaoLayerError},
        entities::user,
    },
    error::AppError,
    state::AppState,
};

pub const LOGIN_PATH: &str = "/accounts/login/";

/// Logged-in user; anonymous requests are sent to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

/// Logged-in user if there is one.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<user::Model>);

impl MaybeUser {
    pub fn id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|user| user.id)
    }
}

/// `/` stays readable in the encoded `next` value.
pub fn login_redirect(next: &str) -> Redirect {
    let encoded = form_urlencoded::byte_serialize(next.as_bytes())
        .collect::<String>()
        .replace("%2F", "/");
    Redirect::to(&format!("{LOGIN_PATH}?next={encoded}"))
}

async fn session_user(
    parts: &mut Parts,
    state: &Arc<AppState>,
) -> Result<Option<user::Model>, AppError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(claims) = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.session.verify(cookie.value()))
    else {
        return Ok(None);
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(None);
    };

    let users = DaoContext::new(&state.db).user();
    match users.find_by_id(user_id).await {
        Ok(found) if found.is_active && claims.matches(&found) => Ok(Some(found)),
        Ok(_) => Ok(None),
        Err(DaoLayerError::NotFound { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        session_user(parts, state).await.map(MaybeUser)
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match session_user(parts, state).await {
            Ok(Some(found)) => Ok(CurrentUser(found)),
            Ok(None) => {
                let next = match parts.extensions.get::<OriginalUri>() {
                    Some(OriginalUri(uri)) => uri.path_and_query().map(|pq| pq.to_string()),
                    None => parts.uri.path_and_query().map(|pq| pq.to_string()),
                }
                .unwrap_or_else(|| "/".to_string());
                Err(login_redirect(&next).into_response())
            }
            Err(err) => Err(err.into_response()),
        }
    }
}
