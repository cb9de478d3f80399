//! Base FX system - the FxRateReader trait

use crate::currency::CurrencyCode;
use crate::error::{GamePlanError, Result};
use crate::finance::checked;
use rust_decimal::Decimal;

/// Trait for reading FX rates from a single snapshot
pub trait FxRateReader {
    /// Get exchange rate from one currency to another.
    /// Returns the rate such that: to_amount = from_amount * rate
    fn get_rate(&self, from_currency: &CurrencyCode, to_currency: &CurrencyCode) -> Result<Decimal>;

    /// Whether amounts with this base currency take part in conversions.
    ///
    /// Fails when there is no snapshot to decide against.
    fn is_convertible(&self, code: &CurrencyCode) -> Result<bool>;

    /// Check if rate is available
    fn has_rate(&self, from_currency: &CurrencyCode, to_currency: &CurrencyCode) -> bool {
        self.get_rate(from_currency, to_currency).is_ok()
    }

    /// Get inverse rate (to/from instead of from/to)
    fn get_inverse_rate(
        &self,
        from_currency: &CurrencyCode,
        to_currency: &CurrencyCode,
    ) -> Result<Decimal> {
        let rate = self.get_rate(to_currency, from_currency)?;
        if rate.is_zero() {
            return Err(GamePlanError::DivisionByZero(format!(
                "zero rate for {}/{}",
                to_currency, from_currency
            )));
        }
        checked::div("inverse rate", Decimal::ONE, rate)
    }
}
