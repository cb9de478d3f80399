//! Exchange-rate sources
//!
//! Both sources read the openexchangerates.org `latest.json` document:
//! `{"base": "USD", "timestamp": 1700000000, "rates": {"EUR": 0.92, ...}}`.
//! - OpenExchangeRates: one blocking HTTP GET
//! - File: the same document saved on disk, for offline planning

pub mod file;
pub mod open_exchange_rates;

pub use file::FileRateSource;
pub use open_exchange_rates::OpenExchangeRatesSource;

use crate::currency::CurrencyCode;
use crate::data::fx::RateTable;
use crate::error::{GamePlanError, Result};
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Trait for one-shot rate snapshot sources
pub trait RateSource {
    /// Fetch the full rate table
    fn fetch(&self) -> Result<RateTable>;

    /// Get the source name
    fn name(&self) -> &str;
}

/// Body of a `latest.json` response
#[derive(Debug, Deserialize)]
pub struct RatesDocument {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub rates: HashMap<String, Decimal>,
}

impl RatesDocument {
    /// Parse a document from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate and turn the document into a rate table
    pub fn into_table(self) -> Result<RateTable> {
        if self.rates.is_empty() {
            return Err(GamePlanError::InvalidData(
                "Rates document contains no rates".to_string(),
            ));
        }

        let mut table = RateTable::from_codes(
            self.rates.iter().map(|(code, value)| (code.as_str(), *value)),
        )?;

        if let Some(base) = self.base.as_deref() {
            table = table.with_reference(CurrencyCode::new(base)?);
        }
        if let Some(published_at) = self
            .timestamp
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        {
            table = table.with_published_at(published_at);
        }

        Ok(table)
    }
}
