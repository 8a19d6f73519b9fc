use crate::config::AppConfig;
use crate::db;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config).await?;
        db::migrate(&db).await?;
        Ok(Self::from_parts(db, Arc::new(config)))
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// State over a pool that never connects until first use.
    ///
    /// Enough for routes that answer without touching the store (health,
    /// banner, rejected queries).
    pub fn lazy(config: AppConfig) -> anyhow::Result<Self> {
        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_lazy(&config.database_url)?;
        Ok(Self::from_parts(db, Arc::new(config)))
    }
}
