use anyhow::{Result, bail};

use super::{AppConfig, defaults};

const MIN_SESSION_SECRET_LEN: usize = 16;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.max_connections == 0 {
        errors.push("database.max_connections must be > 0".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    if cfg.auth.session_secret.len() < MIN_SESSION_SECRET_LEN {
        errors.push(format!(
            "auth.session_secret must be at least {MIN_SESSION_SECRET_LEN} characters"
        ));
    }

    if !cfg!(debug_assertions) && cfg.auth.session_secret == defaults::DEFAULT_SESSION_SECRET {
        errors.push("auth.session_secret must be set in release builds".to_string());
    }

    if cfg.auth.session_ttl_hours == 0 {
        errors.push("auth.session_ttl_hours must be > 0".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
