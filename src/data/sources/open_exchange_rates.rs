//! openexchangerates.org integration
//!
//! One blocking GET of `latest.json`, made once at startup.

use super::{RateSource, RatesDocument};
use crate::data::fx::RateTable;
use crate::error::{GamePlanError, Result};
use reqwest::blocking::Client;

pub const OPEN_EXCHANGE_RATES_URL: &str = "https://openexchangerates.org/api/latest.json";

/// openexchangerates.org source (requires an app id)
#[derive(Debug, Clone)]
pub struct OpenExchangeRatesSource {
    url: String,
    app_id: String,
}

impl OpenExchangeRatesSource {
    /// Create a new source against the default endpoint
    pub fn new(app_id: impl Into<String>) -> Self {
        Self::with_url(OPEN_EXCHANGE_RATES_URL, app_id)
    }

    /// Create a new source against a custom endpoint
    pub fn with_url(url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            app_id: app_id.into(),
        }
    }

    /// Full request URL. Only `url` is ever logged, never this.
    fn request_url(&self) -> String {
        format!("{}?app_id={}", self.url, self.app_id)
    }
}

impl RateSource for OpenExchangeRatesSource {
    fn fetch(&self) -> Result<RateTable> {
        log::info!("Fetching exchange rates from {}", self.url);

        // The client lives only for this request
        let client = Client::builder()
            .user_agent(concat!("fx-gameplan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                GamePlanError::RateUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        let response = client
            .get(self.request_url())
            .send()
            .map_err(|e| GamePlanError::RateUnavailable(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GamePlanError::RateUnavailable(format!(
                "openexchangerates.org returned error: {}",
                response.status()
            )));
        }

        let document: RatesDocument = response
            .json()
            .map_err(|e| GamePlanError::RateUnavailable(format!("JSON parse error: {}", e)))?;

        document.into_table()
    }

    fn name(&self) -> &str {
        "openexchangerates.org"
    }
}
