use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }

    /// Absolute base used when building links that leave the site (reset mails).
    pub fn public_url(&self) -> String {
        match self.general.public_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://{}:{}", self.general.host, self.general.port),
        }
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
    pub public_url: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT as u16,
            public_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS as u32,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE as u32,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub session_secret: String,
    pub session_ttl_hours: u64,
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: defaults::DEFAULT_SESSION_SECRET.to_string(),
            session_ttl_hours: defaults::DEFAULT_SESSION_TTL_HOURS as u64,
            secure_cookies: defaults::DEFAULT_SECURE_COOKIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::AppConfig;
    use crate::config::EnvConfig;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let cfg = AppConfig::from_sources(None, Some(HashMap::new())).expect("defaults load");

        assert_eq!(cfg.general.host, "127.0.0.1");
        assert_eq!(cfg.general.port, 3000);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.auth.session_ttl_hours, 336);
        assert_eq!(cfg.public_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn nested_sections_are_read_from_prefixed_variables() {
        let cfg = AppConfig::from_sources(
            None,
            Some(vars(&[
                ("APP_GENERAL__PORT", "8080"),
                ("APP_GENERAL__PUBLIC_URL", "https://recipes.example.com/"),
                ("APP_DATABASE__URL", "postgres://localhost/recipes"),
                ("APP_AUTH__SECURE_COOKIES", "true"),
            ])),
        )
        .expect("config should load");

        assert_eq!(cfg.general.port, 8080);
        assert_eq!(cfg.database.url, "postgres://localhost/recipes");
        assert!(cfg.auth.secure_cookies);
        assert_eq!(cfg.public_url(), "https://recipes.example.com");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::from_sources(None, Some(vars(&[("APP_GENERAL__COLOR", "blue")])))
            .expect_err("unknown key should fail");

        assert!(err.to_string().contains("failed to deserialize configuration"));
    }
}
