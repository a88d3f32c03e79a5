use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use runtime::{AppConfig, DatabaseConfig};
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::CardsConfig;
use crate::domain::service::CardService;
use crate::domain::store::DocumentStore;
use crate::infra::storage::{open_memory_store, open_mongo_store};

/// Which backend the module should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Memory,
}

/// Wires the document store to the card service and exposes its REST routes.
#[derive(Clone)]
pub struct CardsModule {
    service: Arc<CardService>,
    config: CardsConfig,
}

impl CardsModule {
    pub const NAME: &'static str = "cards";

    /// Read `modules.cards`, open the selected store and build the service.
    pub async fn init(app: &AppConfig, kind: StoreKind) -> anyhow::Result<Self> {
        info!("Initializing cards module");

        let cfg: CardsConfig = app.module_config(Self::NAME)?;
        debug!(
            "Loaded cards config: collection={}, unique_cards={}",
            cfg.collection, cfg.unique_cards
        );

        let store = match kind {
            StoreKind::Memory => open_memory_store(&cfg),
            StoreKind::Mongo => {
                let db = app.database.clone().unwrap_or_else(|| {
                    debug!("No database section, using default MongoDB settings");
                    DatabaseConfig::default()
                });
                open_mongo_store(&db, &cfg)
                    .await
                    .context("Failed to open cards store")?
            }
        };

        Ok(Self::with_store(store, cfg))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>, config: CardsConfig) -> Self {
        Self {
            service: Arc::new(CardService::new(store)),
            config,
        }
    }

    pub fn service(&self) -> Arc<CardService> {
        self.service.clone()
    }

    pub fn config(&self) -> &CardsConfig {
        &self.config
    }

    /// Standalone router holding only the card endpoints.
    pub fn router(&self) -> Router {
        self.register_rest(Router::new())
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering cards REST routes");
        routes::register_routes(router, self.service.clone())
    }
}
