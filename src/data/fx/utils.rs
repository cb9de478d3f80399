//! FX utilities - amount conversions

use super::base::FxRateReader;
use crate::currency::CurrencyCode;
use crate::error::Result;
use crate::finance::checked;
use rust_decimal::Decimal;

/// Convert amount from one currency to another
///
/// Same-currency conversions never consult the reader.
pub fn convert_amount<R: FxRateReader + ?Sized>(
    reader: &R,
    amount: Decimal,
    from: &CurrencyCode,
    to: &CurrencyCode,
) -> Result<Decimal> {
    if from == to {
        return Ok(amount);
    }
    let rate = reader.get_rate(from, to)?;
    checked::mul("conversion", amount, rate)
}

/// Batch convert multiple amounts at once
pub fn convert_amounts<R: FxRateReader + ?Sized>(
    reader: &R,
    amounts: &[Decimal],
    from: &CurrencyCode,
    to: &CurrencyCode,
) -> Result<Vec<Decimal>> {
    if from == to {
        return Ok(amounts.to_vec());
    }
    let rate = reader.get_rate(from, to)?;
    amounts
        .iter()
        .map(|amount| checked::mul("conversion", *amount, rate))
        .collect()
}

/// Multiply `amount` by `rate` and round to `dp` places (midpoint to even)
pub fn apply_rate(amount: Decimal, rate: Decimal, dp: u32) -> Result<Decimal> {
    Ok(checked::mul("conversion", amount, rate)?.round_dp(dp))
}
