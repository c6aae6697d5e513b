//! Wiring of providers, engine and transaction store.

use std::sync::Arc;

use fintrack_fx::{
    ConversionEngine, FxEngineConfig, HttpProviderConfig, HttpRateProvider, MockRateProvider,
    ProviderRegistry,
};
use fintrack_ledger::{SqliteTransactionStore, TransactionRepository};
use tracing::{info, warn};

use crate::config::TrackerConfig;

/// Assembled application services.
pub struct FinanceTracker {
    pub engine: ConversionEngine,
    pub transactions: Arc<dyn TransactionRepository>,
}

impl FinanceTracker {
    /// Build the tracker and open the SQLite store named by the configuration.
    pub async fn build(config: &TrackerConfig) -> anyhow::Result<Self> {
        let store = SqliteTransactionStore::open(&config.database_url).await?;
        Self::with_store(config, Arc::new(store))
    }

    /// Build the tracker over an existing transaction store.
    ///
    /// The mock provider is registered first and is active unless the
    /// configuration names another registered provider.
    pub fn with_store(
        config: &TrackerConfig,
        transactions: Arc<dyn TransactionRepository>,
    ) -> anyhow::Result<Self> {
        let registry = Arc::new(ProviderRegistry::new());

        registry.register(Arc::new(
            MockRateProvider::new().with_latency(config.rates.mock_latency.clone()),
        ));
        registry.register(Arc::new(HttpRateProvider::new(HttpProviderConfig {
            base_url: config.rates.base_url.clone(),
            timeout: config.rates.http_timeout,
        })?));

        if let Some(id) = &config.rates.default_provider {
            if registry.contains(id) {
                registry.set_active(id);
            } else {
                warn!(provider = %id, "Configured default provider is not registered");
            }
        }

        let engine = ConversionEngine::with_config(
            registry,
            FxEngineConfig {
                history_capacity: config.rates.history_capacity,
            },
        );

        info!(
            providers = engine.registry().len(),
            active = ?engine.registry().active_id(),
            "Finance tracker ready"
        );

        Ok(Self {
            engine,
            transactions,
        })
    }
}
