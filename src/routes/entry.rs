use std::{path::PathBuf, sync::Arc};

use axum::{Router, response::Redirect, routing::get};
use tower_http::services::ServeDir;

use super::{accounts, next_url::RECIPES_HOME, recipes};
use crate::state::AppState;

pub const STATIC_PREFIX: &str = "/static";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(RECIPES_HOME) }))
        .merge(accounts::router(state.clone()))
        .merge(recipes::router(state))
        .nest_service(STATIC_PREFIX, ServeDir::new(resolve_public_dir()))
}

fn resolve_public_dir() -> PathBuf {
    if let Some(path) = std::env::var_os("RECIPE_BOX_PUBLIC_DIR") {
        return PathBuf::from(path);
    }

    if let Ok(current_dir) = std::env::current_dir() {
        let candidate = current_dir.join("public");
        if candidate.exists() {
            return candidate;
        }
    }

    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        let candidate = exe_dir.join("public");
        if candidate.exists() {
            return candidate;
        }
    }

    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("public")
}
