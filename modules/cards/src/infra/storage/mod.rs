mod memory_store;
mod mongo_store;

use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::DatabaseConfig;

use crate::config::CardsConfig;
use crate::domain::store::DocumentStore;

pub use memory_store::MemoryStore;
pub use mongo_store::MongoStore;

/// Fields covered by the optional unique card index.
pub const CARD_KEY_FIELDS: [&str; 2] = ["suit", "rank"];

/// Connect to MongoDB and verify it answers before the server starts.
pub async fn open_mongo_store(
    db: &DatabaseConfig,
    cfg: &CardsConfig,
) -> Result<Arc<dyn DocumentStore>> {
    let store = MongoStore::connect(&db.url, &db.name, &cfg.collection, db.max_pool_size)
        .await
        .with_context(|| format!("Failed to configure MongoDB client for {}", db.url))?;

    store
        .ping()
        .await
        .with_context(|| format!("MongoDB at {} is not reachable", db.url))?;

    if cfg.unique_cards {
        store
            .ensure_unique_index(&CARD_KEY_FIELDS)
            .await
            .context("Failed to create unique card index")?;
    }

    tracing::info!(
        database = %db.name,
        collection = %cfg.collection,
        unique_cards = cfg.unique_cards,
        "MongoDB store ready"
    );
    Ok(Arc::new(store))
}

/// In-process store honouring the same uniqueness option.
pub fn open_memory_store(cfg: &CardsConfig) -> Arc<dyn DocumentStore> {
    let store = if cfg.unique_cards {
        MemoryStore::new().with_unique_index(&CARD_KEY_FIELDS)
    } else {
        MemoryStore::new()
    };
    tracing::info!(collection = %cfg.collection, "Using in-memory card store");
    Arc::new(store)
}
