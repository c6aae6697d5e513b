//! Tracker configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

use fintrack_fx::{DEFAULT_BASE_URL, DEFAULT_HISTORY_CAPACITY};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Rate provider and conversion configuration.
#[derive(Debug, Clone)]
pub struct RatesConfig {
    /// Base URL of the live rates endpoint.
    pub base_url: String,
    /// Per-request timeout for the live provider.
    pub http_timeout: Option<Duration>,
    /// Simulated latency of the mock provider.
    pub mock_latency: RangeInclusive<Duration>,
    /// Provider selected at startup instead of the first registered one.
    pub default_provider: Option<String>,
    /// Number of recent conversions kept.
    pub history_capacity: usize,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout: None,
            mock_latency: Duration::from_millis(100)..=Duration::from_millis(300),
            default_provider: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Main tracker configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Transactions database URL.
    pub database_url: String,
    /// Rates configuration.
    pub rates: RatesConfig,
    /// Log level.
    pub log_level: String,
    /// Log format.
    pub log_format: LogFormat,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://fintrack.db".to_string(),
            rates: RatesConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("FINTRACK_DATABASE_URL") {
            config.database_url = url;
        }

        if let Some(url) = lookup("FINTRACK_RATES_URL") {
            config.rates.base_url = url;
        }

        if let Some(secs) = lookup("FINTRACK_HTTP_TIMEOUT_SECS") {
            if let Ok(secs) = secs.trim().parse() {
                config.rates.http_timeout = Some(Duration::from_secs(secs));
            }
        }

        if let Some(range) = lookup("FINTRACK_MOCK_LATENCY_MS") {
            if let Some(range) = parse_latency_range(&range) {
                config.rates.mock_latency = range;
            }
        }

        if let Some(id) = lookup("FINTRACK_DEFAULT_PROVIDER") {
            if !id.trim().is_empty() {
                config.rates.default_provider = Some(id.trim().to_string());
            }
        }

        if let Some(capacity) = lookup("FINTRACK_HISTORY_CAPACITY") {
            if let Ok(capacity) = capacity.trim().parse() {
                config.rates.history_capacity = capacity;
            }
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(format) = lookup("FINTRACK_LOG_FORMAT") {
            if format.eq_ignore_ascii_case("json") {
                config.log_format = LogFormat::Json;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        if self.rates.base_url.is_empty() {
            return Err("Rates URL cannot be empty".to_string());
        }

        if self.rates.history_capacity == 0 {
            return Err("History capacity must be at least 1".to_string());
        }

        if self.rates.mock_latency.start() > self.rates.mock_latency.end() {
            return Err("Mock latency minimum cannot exceed maximum".to_string());
        }

        Ok(())
    }
}

/// Parse `"min-max"` or `"fixed"` milliseconds.
pub fn parse_latency_range(s: &str) -> Option<RangeInclusive<Duration>> {
    let (lo, hi) = match s.split_once('-') {
        Some((lo, hi)) => (lo.trim().parse().ok()?, hi.trim().parse().ok()?),
        None => {
            let fixed = s.trim().parse().ok()?;
            (fixed, fixed)
        }
    };
    Some(Duration::from_millis(lo)..=Duration::from_millis(hi))
}
