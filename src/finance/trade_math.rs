//! Per-entry trade arithmetic: profit/loss, margin, swap and Fibonacci lot sizing
//!
//! Every function works on exact decimals. Conversions go through an
//! [`FxRateReader`] and only happen when the pair's base currency is
//! convertible (present in the rate snapshot and not a metal/special code).

use crate::currency::{CurrencyCode, CurrencyPair};
use crate::data::fx::FxRateReader;
use crate::error::{GamePlanError, Result};
use crate::finance::checked;
use rust_decimal::Decimal;

/// Profit or loss of moving `lot_size` units from `entry_price` to `exit_price`.
///
/// The raw amount `(exit - entry) * lot_size` is converted at
/// `rate(base, quote)` when the base currency is convertible and differs
/// from the quote currency. Instruments with a non-convertible base
/// (e.g. XAUUSD) are priced directly in the quote currency and returned as is.
/// Without a rate snapshot nothing can be decided and `RateUnavailable` is returned.
pub fn profit_loss<R: FxRateReader + ?Sized>(
    rates: &R,
    pair: &CurrencyPair,
    entry_price: Decimal,
    exit_price: Decimal,
    lot_size: Decimal,
) -> Result<Decimal> {
    let price_move = checked::sub("price move", exit_price, entry_price)?;
    let raw = checked::mul("profit/loss", price_move, lot_size)?;

    if !rates.is_convertible(&pair.base)? || pair.is_same_currency() {
        return Ok(raw);
    }

    let rate = rates.get_rate(&pair.base, &pair.quote)?;
    checked::mul("profit/loss", raw, rate)
}

/// Margin required to open `lot_size` lots: `lot * contract * price / leverage`
pub fn margin_required(
    lot_size: Decimal,
    contract_size: Decimal,
    price: Decimal,
    leverage: Decimal,
) -> Result<Decimal> {
    if leverage.is_zero() {
        return Err(GamePlanError::DivisionByZero(
            "leverage must not be zero".to_string(),
        ));
    }
    let units = checked::mul("margin", lot_size, contract_size)?;
    let notional = checked::mul("margin", units, price)?;
    checked::div("margin", notional, leverage)
}

/// Holding terms a swap is charged for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapTerms {
    /// Days the position is held
    pub days: u32,
    /// Multiplier for triple-swap days
    pub ticket_size: Decimal,
    pub lot_size: Decimal,
}

impl Default for SwapTerms {
    fn default() -> Self {
        Self {
            days: 1,
            ticket_size: Decimal::ONE,
            lot_size: Decimal::ONE,
        }
    }
}

/// Swap cost of holding a position.
///
/// `days * lot_size * swap_rate * ticket_size`, then, for a convertible base
/// that differs from the quote, converted base -> quote -> account currency.
pub fn swap_cost<R: FxRateReader + ?Sized>(
    rates: &R,
    pair: &CurrencyPair,
    swap_rate: Decimal,
    terms: SwapTerms,
) -> Result<Decimal> {
    let amount = [terms.lot_size, swap_rate, terms.ticket_size]
        .into_iter()
        .try_fold(Decimal::from(terms.days), |acc, factor| {
            checked::mul("swap", acc, factor)
        })?;

    if !rates.is_convertible(&pair.base)? || pair.is_same_currency() {
        return Ok(amount);
    }

    let in_quote = checked::mul("swap", amount, rates.get_rate(&pair.base, &pair.quote)?)?;
    checked::mul(
        "swap",
        in_quote,
        rates.get_rate(&pair.quote, &CurrencyCode::account())?,
    )
}

/// The first `n` non-zero Fibonacci numbers, each scaled by `unit_lot_size`.
///
/// `fibonacci_lots(5, 1) == [1, 1, 2, 3, 5]`; `n == 0` gives an empty vector.
/// A ladder long or coarse enough to leave the decimal range is an error.
pub fn fibonacci_lots(n: usize, unit_lot_size: Decimal) -> Result<Vec<Decimal>> {
    let mut lots = Vec::with_capacity(n);
    let (mut prev, mut curr) = (Decimal::ZERO, Decimal::ONE);

    for i in 0..n {
        lots.push(checked::mul("fibonacci lot", curr, unit_lot_size)?);
        if i + 1 < n {
            let next = checked::add("fibonacci lot", prev, curr)?;
            prev = curr;
            curr = next;
        }
    }

    Ok(lots)
}
