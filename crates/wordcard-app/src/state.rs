use std::sync::Arc;

use anyhow::Context;
use wordcard_config::Config;
use wordcard_store::SqliteStore;

pub struct AppState {
    pub config: Config,
    pub store: Arc<SqliteStore>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let connections = config.pipeline.concurrency.max(1) as u32;
        let store = SqliteStore::open(&config.storage.database_path, connections)
            .await
            .with_context(|| format!("Failed to open {}", config.storage.database_path.display()))?;

        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }
}
