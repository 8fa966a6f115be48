use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use super::registry::{DbProvider, DbProviderId, pool_options};
use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

pub struct SqliteDbProvider;

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Sqlite
    }

    fn supports_url(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("sqlite:")
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        Ok(Database::connect(pool_options(cfg)).await?)
    }

    /// Cascading deletes of ingredients, instructions and favorites rely on
    /// foreign keys being enforced.
    async fn post_connect(&self, db: &DatabaseConnection, _cfg: &DatabaseConfig) -> Result<()> {
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteDbProvider;
    use crate::db::providers::DbProvider;

    #[test]
    fn accepts_file_and_memory_urls() {
        let provider = SqliteDbProvider;

        assert!(provider.supports_url("sqlite://recipe_box.db?mode=rwc"));
        assert!(provider.supports_url("SQLITE::memory:"));
        assert!(!provider.supports_url("postgres://localhost/recipes"));
    }
}
