use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

pub const RECIPES_HOME: &str = "/recipes/";

/// Recipe-scoped pages: the detail page and the add/update steps of the
/// submit flow.
static RECIPE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^/recipes/(?:submit/)?(?P<id>[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12})(?:/(?:add-ingredient|add-instruction|update_recipe))?/?(?:[?#].*)?$",
    )
    .unwrap_or_else(|err| panic!("recipe path regex failed to compile: {err}"))
});

/// Only same-site absolute paths; no scheme, host or protocol-relative URL.
pub fn is_local_path(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(char::is_control)
}

pub fn recipe_id_in(next: &str) -> Option<Uuid> {
    RECIPE_PATH_RE
        .captures(next)
        .and_then(|caps| caps.name("id"))
        .and_then(|id| Uuid::parse_str(id.as_str()).ok())
}

pub fn recipe_detail_path(recipe_id: Uuid) -> String {
    format!("/recipes/{recipe_id}")
}

/// Where to go after changing something that belongs to `recipe_id`.
pub fn after_recipe_change(next: Option<&str>, recipe_id: Uuid) -> String {
    match next.map(str::trim) {
        Some(next)
            if is_local_path(next)
                && recipe_id_in(next).is_none_or(|named| named == recipe_id) =>
        {
            next.to_string()
        }
        _ => recipe_detail_path(recipe_id),
    }
}

pub fn after_login(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(next) if is_local_path(next) => next.to_string(),
        _ => RECIPES_HOME.to_string(),
    }
}
