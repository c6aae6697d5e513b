//! Conversion engine: active provider lookup, rate application and history.

use std::sync::Arc;

use fintrack_common::{now_millis, Currency, CurrencyCatalog, CurrencyCode, CurrencyPair, Subscription};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::conversion::ConversionResult;
use crate::error::{FxError, FxResult};
use crate::history::{RecentConversions, DEFAULT_HISTORY_CAPACITY};
use crate::registry::{ProviderDescriptor, ProviderRegistry};

/// Configuration for the conversion engine.
#[derive(Debug, Clone)]
pub struct FxEngineConfig {
    /// Number of recent conversions kept.
    pub history_capacity: usize,
}

impl Default for FxEngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Converts amounts through the registry's active provider and records
/// every successful conversion.
pub struct ConversionEngine {
    registry: Arc<ProviderRegistry>,
    history: Arc<RecentConversions>,
}

impl ConversionEngine {
    /// Create an engine over an existing registry and history.
    pub fn new(registry: Arc<ProviderRegistry>, history: Arc<RecentConversions>) -> Self {
        Self { registry, history }
    }

    /// Create an engine with a fresh history sized by `config`.
    pub fn with_config(registry: Arc<ProviderRegistry>, config: FxEngineConfig) -> Self {
        let history = Arc::new(RecentConversions::with_capacity(config.history_capacity));
        Self::new(registry, history)
    }

    /// Convert `amount` from one currency to another.
    ///
    /// Returns `None` when no provider is active, the active provider has
    /// no rate for the pair, or the product is out of range. The cause is
    /// logged, not returned.
    #[instrument(skip(self), fields(from = %from, to = %to, amount = %amount))]
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Option<ConversionResult> {
        match self.try_convert(amount, from, to).await {
            Ok(result) => {
                info!(
                    rate = %result.rate,
                    to_amount = %result.to_amount,
                    "Conversion completed"
                );
                self.history.record(result.clone());
                Some(result)
            }
            Err(e) => {
                warn!(error = %e, "Conversion unavailable");
                None
            }
        }
    }

    async fn try_convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> FxResult<ConversionResult> {
        let (provider_id, rate) = self.fetch_rate(from, to).await?;
        debug!(provider = %provider_id, rate = %rate, "Applying rate");

        ConversionResult::new(from.clone(), to.clone(), amount, rate, now_millis())
    }

    async fn fetch_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> FxResult<(String, Decimal)> {
        // The registry lock is released before the provider is queried.
        let provider = self.registry.get_active().ok_or(FxError::NoActiveProvider)?;
        let provider_id = provider.id().to_string();

        let rate = provider
            .get_rate(from, to)
            .await
            .ok_or_else(|| FxError::RateNotAvailable {
                provider: provider_id.clone(),
                pair: CurrencyPair::new(from.clone(), to.clone()),
            })?;

        Ok((provider_id, rate))
    }

    /// Current rate from the active provider, without recording history.
    pub async fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        match self.fetch_rate(from, to).await {
            Ok((_, rate)) => Some(rate),
            Err(e) => {
                debug!(error = %e, "Rate unavailable");
                None
            }
        }
    }

    /// Currencies offered for conversion.
    pub fn supported_currencies(&self) -> Vec<Currency> {
        CurrencyCatalog::list_all()
    }

    /// Recent conversions, most recent first.
    pub fn recent_conversions(&self) -> Vec<ConversionResult> {
        self.history.snapshot()
    }

    /// Subscribe to the recent-conversions list.
    pub fn subscribe_recent(&self) -> Subscription<Vec<ConversionResult>> {
        self.history.subscribe()
    }

    /// Forget all recent conversions.
    pub fn clear_recent(&self) {
        self.history.clear();
    }

    /// Select the active provider. Unknown ids are ignored.
    pub fn set_active_provider(&self, id: &str) {
        self.registry.set_active(id);
    }

    /// Registered providers with their active flag.
    pub fn providers(&self) -> Vec<ProviderDescriptor> {
        self.registry.descriptors()
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn history(&self) -> &Arc<RecentConversions> {
        &self.history
    }
}
