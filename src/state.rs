use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::SessionKeys, config::AppConfig, mail::Mailer};

pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub session: SessionKeys,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, mailer: Arc<dyn Mailer>) -> Arc<Self> {
        Arc::new(Self {
            session: SessionKeys::from_config(&config.auth),
            config,
            db,
            mailer,
        })
    }
}
