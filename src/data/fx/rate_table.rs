//! Rate snapshot and the provider that derives cross rates from it
//!
//! The snapshot stores every currency relative to one reference currency
//! (USD for openexchangerates.org). Any cross rate is derived as
//! `rate(A, B) = table[B] / table[A]`.

use super::base::FxRateReader;
use crate::currency::CurrencyCode;
use crate::data::sources::RateSource;
use crate::error::{GamePlanError, Result};
use crate::finance::checked;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use rust_decimal::Decimal;

/// Immutable mapping of currency code to value relative to the reference currency
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<CurrencyCode, Decimal>,
    /// Reference currency the magnitudes are quoted against, if the source reported one
    reference: Option<CurrencyCode>,
    /// When the source published the snapshot
    published_at: Option<DateTime<Utc>>,
}

impl RateTable {
    /// Build a table, rejecting non-positive magnitudes
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (CurrencyCode, Decimal)>,
    {
        let mut rates = HashMap::new();
        for (code, value) in entries {
            if value <= Decimal::ZERO {
                return Err(GamePlanError::InvalidData(format!(
                    "FX rate must be positive, got {} for {}",
                    value, code
                )));
            }
            rates.insert(code, value);
        }

        Ok(Self {
            rates,
            reference: None,
            published_at: None,
        })
    }

    /// Build from raw string codes, as found in a rates document
    pub fn from_codes<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Decimal)>,
    {
        let entries = entries
            .into_iter()
            .map(|(code, value)| Ok((CurrencyCode::new(code)?, value)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(entries)
    }

    pub fn with_reference(mut self, reference: CurrencyCode) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn reference(&self) -> Option<&CurrencyCode> {
        self.reference.as_ref()
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Magnitude of `code` relative to the reference currency
    pub fn get(&self, code: &CurrencyCode) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Codes usable for pair conversion, sorted. Special `X` codes are left out.
    pub fn convertible_codes(&self) -> Vec<&CurrencyCode> {
        let mut codes: Vec<&CurrencyCode> =
            self.rates.keys().filter(|code| !code.is_special()).collect();
        codes.sort();
        codes
    }

    fn lookup(&self, code: &CurrencyCode) -> Result<Decimal> {
        self.get(code)
            .ok_or_else(|| GamePlanError::UnknownCurrency(code.to_string()))
    }

    /// Cross rate `table[quote] / table[base]`
    pub fn cross_rate(&self, base: &CurrencyCode, quote: &CurrencyCode) -> Result<Decimal> {
        let base_value = self.lookup(base)?;
        let quote_value = self.lookup(quote)?;
        if base == quote {
            return Ok(Decimal::ONE);
        }
        checked::div("cross rate", quote_value, base_value)
    }
}

/// Live exchange-rate snapshot, loaded once per process run.
///
/// A failed load leaves the provider unavailable: every conversion then
/// returns [`GamePlanError::RateUnavailable`] with the original reason.
#[derive(Debug, Clone)]
pub struct RateProvider {
    state: ProviderState,
}

#[derive(Debug, Clone)]
enum ProviderState {
    Ready(RateTable),
    Unavailable(String),
}

impl RateProvider {
    /// Create a provider over an already loaded table
    pub fn new(table: RateTable) -> Self {
        Self {
            state: ProviderState::Ready(table),
        }
    }

    /// Create a provider that refuses every conversion
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: ProviderState::Unavailable(reason.into()),
        }
    }

    /// Perform the one-time fetch from `source`
    pub fn load<S: RateSource + ?Sized>(source: &S) -> Self {
        match source.fetch() {
            Ok(table) => {
                log::info!(
                    "Loaded {} exchange rates from {}",
                    table.len(),
                    source.name()
                );
                Self::new(table)
            }
            Err(e) => {
                log::error!("Failed to load exchange rates from {}: {}", source.name(), e);
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ProviderState::Ready(_))
    }

    /// The loaded table, or `RateUnavailable`
    pub fn table(&self) -> Result<&RateTable> {
        match &self.state {
            ProviderState::Ready(table) => Ok(table),
            ProviderState::Unavailable(reason) => {
                Err(GamePlanError::RateUnavailable(reason.clone()))
            }
        }
    }

    /// Cross rate between two codes
    pub fn rate(&self, base: &CurrencyCode, quote: &CurrencyCode) -> Result<Decimal> {
        self.table()?.cross_rate(base, quote)
    }
}

impl FxRateReader for RateProvider {
    fn get_rate(&self, from_currency: &CurrencyCode, to_currency: &CurrencyCode) -> Result<Decimal> {
        let rate = self.rate(from_currency, to_currency)?;
        log::debug!("Rate {}/{} = {}", from_currency, to_currency, rate);
        Ok(rate)
    }

    fn is_convertible(&self, code: &CurrencyCode) -> Result<bool> {
        let table = self.table()?;
        Ok(table.contains(code) && !code.is_special())
    }
}
