//! Currency codes, pairs and the reference currency catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a new currency code, normalized to upper case.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Get the standard decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "VND" => 0,
            "BHD" | "KWD" | "OMR" => 3,
            _ => 2,
        }
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An ordered currency pair. `USD/EUR` and `EUR/USD` are distinct pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Source currency.
    pub base: CurrencyCode,
    /// Target currency.
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Reference data for a supported currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: CurrencyCode,
    pub name: String,
    pub symbol: Option<String>,
    pub flag: Option<String>,
}

impl Currency {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: CurrencyCode::new(code),
            name: name.into(),
            symbol: None,
            flag: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{} - {} ({})", self.code, self.name, symbol),
            None => write!(f, "{} - {}", self.code, self.name),
        }
    }
}

/// (code, name, symbol, flag)
const SUPPORTED_CURRENCIES: &[(&str, &str, &str, &str)] = &[
    ("USD", "US Dollar", "$", "🇺🇸"),
    ("EUR", "Euro", "€", "🇪🇺"),
    ("GBP", "British Pound", "£", "🇬🇧"),
    ("JPY", "Japanese Yen", "¥", "🇯🇵"),
    ("CNY", "Chinese Yuan", "¥", "🇨🇳"),
    ("CAD", "Canadian Dollar", "C$", "🇨🇦"),
    ("AUD", "Australian Dollar", "A$", "🇦🇺"),
    ("CHF", "Swiss Franc", "Fr", "🇨🇭"),
    ("SEK", "Swedish Krona", "kr", "🇸🇪"),
    ("NOK", "Norwegian Krone", "kr", "🇳🇴"),
    ("DKK", "Danish Krone", "kr", "🇩🇰"),
    ("PLN", "Polish Zloty", "zł", "🇵🇱"),
    ("CZK", "Czech Koruna", "Kč", "🇨🇿"),
    ("HUF", "Hungarian Forint", "Ft", "🇭🇺"),
    ("RON", "Romanian Leu", "lei", "🇷🇴"),
    ("BGN", "Bulgarian Lev", "лв", "🇧🇬"),
    ("HRK", "Croatian Kuna", "kn", "🇭🇷"),
    ("RUB", "Russian Ruble", "₽", "🇷🇺"),
    ("TRY", "Turkish Lira", "₺", "🇹🇷"),
    ("INR", "Indian Rupee", "₹", "🇮🇳"),
    ("KRW", "South Korean Won", "₩", "🇰🇷"),
    ("SGD", "Singapore Dollar", "S$", "🇸🇬"),
    ("HKD", "Hong Kong Dollar", "HK$", "🇭🇰"),
    ("MXN", "Mexican Peso", "$", "🇲🇽"),
    ("BRL", "Brazilian Real", "R$", "🇧🇷"),
    ("AED", "UAE Dirham", "د.إ", "🇦🇪"),
    ("SAR", "Saudi Riyal", "﷼", "🇸🇦"),
    ("QAR", "Qatari Riyal", "﷼", "🇶🇦"),
    ("KWD", "Kuwaiti Dinar", "د.ك", "🇰🇼"),
    ("BHD", "Bahraini Dinar", "د.ب", "🇧🇭"),
    ("EGP", "Egyptian Pound", "£", "🇪🇬"),
    ("ZAR", "South African Rand", "R", "🇿🇦"),
    ("NZD", "New Zealand Dollar", "NZ$", "🇳🇿"),
    ("THB", "Thai Baht", "฿", "🇹🇭"),
    ("MYR", "Malaysian Ringgit", "RM", "🇲🇾"),
    ("IDR", "Indonesian Rupiah", "Rp", "🇮🇩"),
    ("PHP", "Philippine Peso", "₱", "🇵🇭"),
    ("VND", "Vietnamese Dong", "₫", "🇻🇳"),
];

/// Static catalog of the currencies the application offers for conversion.
pub struct CurrencyCatalog;

impl CurrencyCatalog {
    /// All supported currencies, in display order.
    pub fn list_all() -> Vec<Currency> {
        SUPPORTED_CURRENCIES
            .iter()
            .map(|(code, name, symbol, flag)| {
                Currency::new(*code, *name)
                    .with_symbol(*symbol)
                    .with_flag(*flag)
            })
            .collect()
    }

    /// Look up a currency by code.
    pub fn find(code: &CurrencyCode) -> Option<Currency> {
        Self::list_all().into_iter().find(|c| &c.code == code)
    }

    /// Check if a code is in the catalog.
    pub fn contains(code: &CurrencyCode) -> bool {
        SUPPORTED_CURRENCIES
            .iter()
            .any(|(c, _, _, _)| *c == code.code())
    }
}
