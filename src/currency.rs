//! Currency codes and pairs

use crate::error::{GamePlanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency every amount in the final report is settled in.
pub const ACCOUNT_CURRENCY: &str = "USD";

/// Three-letter currency code, stored uppercase (e.g. `USD`, `XAU`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a code, accepting lowercase input
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GamePlanError::MalformedInput(format!(
                "Currency code must be three letters, got: {:?}",
                code
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// The account currency
    pub fn account() -> Self {
        Self(ACCOUNT_CURRENCY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Metals and special drawing codes start with `X` (XAU, XAG, XDR, ...)
    pub fn is_special(&self) -> bool {
        self.0.starts_with('X')
    }

    /// Whether this is the account currency
    pub fn is_account(&self) -> bool {
        self.0 == ACCOUNT_CURRENCY
    }
}

impl FromStr for CurrencyCode {
    type Err = GamePlanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = GamePlanError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Traded instrument, e.g. EURUSD or XAUUSD
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    /// Create new currency pair
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Get the inverse pair
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    /// Pair priced in its own currency (e.g. USDUSD)
    pub fn is_same_currency(&self) -> bool {
        self.base == self.quote
    }

    /// Six-letter symbol without separator
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = GamePlanError;

    /// Parse from `"EURUSD"` or `"EUR/USD"`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((base, quote)) = s.split_once('/') {
            return Ok(Self::new(base.parse()?, quote.parse()?));
        }
        if s.len() == 6 && s.is_ascii() {
            return Ok(Self::new(s[0..3].parse()?, s[3..6].parse()?));
        }
        Err(GamePlanError::MalformedInput(format!(
            "Invalid currency pair format: {}",
            s
        )))
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}
