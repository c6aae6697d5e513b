//! FinTrack exchange rates
//!
//! Currency conversion through a registry of pluggable rate providers.
//!
//! # Features
//!
//! - Mock provider with a fixed USD-based table and simulated latency
//! - Live provider for ExchangeRate-API compatible endpoints
//! - Single active provider, switchable at runtime
//! - Observable list of recent conversions, one per ordered pair
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fintrack_fx::{ConversionEngine, FxEngineConfig, MockRateProvider, ProviderRegistry};
//! use fintrack_common::CurrencyCode;
//!
//! let registry = Arc::new(ProviderRegistry::new());
//! registry.register(Arc::new(MockRateProvider::new()));
//!
//! let engine = ConversionEngine::with_config(registry, FxEngineConfig::default());
//! let result = engine.convert(dec!(100), &CurrencyCode::usd(), &CurrencyCode::eur()).await;
//! ```

pub mod conversion;
pub mod engine;
pub mod error;
pub mod history;
pub mod http;
pub mod provider;
pub mod registry;

pub use conversion::{parse_amount, ConversionResult};
pub use engine::{ConversionEngine, FxEngineConfig};
pub use error::{FxError, FxResult};
pub use history::{RecentConversions, DEFAULT_HISTORY_CAPACITY};
pub use http::{HttpProviderConfig, HttpRateProvider, DEFAULT_BASE_URL};
pub use provider::{MockRateProvider, RateProvider};
pub use registry::{ProviderDescriptor, ProviderRegistry};
