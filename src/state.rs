use crate::{config::AppConfig, db::DbPool, services::provider::AuthProvider};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub provider: AuthProvider,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, provider: AuthProvider) -> Self {
        Self {
            config,
            db,
            provider,
        }
    }
}
