//! Folds averaging entries into a plan summary
//!
//! Lifecycle: the aggregator is created once rates are available, entries
//! are appended one by one, and `finalize` consumes it to produce the
//! immutable [`FinalizedPlan`].

use super::entry::Entry;
use crate::currency::{CurrencyCode, CurrencyPair};
use crate::data::fx::{apply_rate, FxRateReader};
use crate::error::{GamePlanError, Result};
use crate::finance::constants::{DEFAULT_PIP_INCREMENT, MONEY_DP};
use crate::finance::{checked, margin_required, profit_loss, swap_cost, SwapTerms};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade parameters shared by every entry of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanParameters {
    pub pair: CurrencyPair,
    /// Units per lot (100000 for a standard FX lot)
    pub contract_size: Decimal,
    pub leverage: Decimal,
    /// Broker swap rate per lot per day
    pub swap_rate: Decimal,
    pub stop_price: Decimal,
    /// Minimum price increment one pip is measured in
    pub pip_increment: Decimal,
}

impl PlanParameters {
    pub fn new(
        pair: CurrencyPair,
        contract_size: Decimal,
        leverage: Decimal,
        swap_rate: Decimal,
        stop_price: Decimal,
    ) -> Self {
        Self {
            pair,
            contract_size,
            leverage,
            swap_rate,
            stop_price,
            pip_increment: DEFAULT_PIP_INCREMENT,
        }
    }

    pub fn with_pip_increment(mut self, pip_increment: Decimal) -> Self {
        self.pip_increment = pip_increment;
        self
    }
}

/// Aggregate figures of a finalized plan, all in the settlement currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub weighted_average_price: Decimal,
    pub total_margin: Decimal,
    /// Sum of profit/loss magnitudes
    pub total_profit_loss: Decimal,
    /// Margin plus profit/loss: what the account must be able to carry
    pub total_exposure: Decimal,
    pub total_lot_size: Decimal,
    /// Whole pips between the stop and the farthest entry
    pub pip_distance: Decimal,
    pub roe_percent: Decimal,
    pub daily_swap_total: Decimal,
}

/// Output of [`PlanAggregator::finalize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedPlan {
    pub pair: CurrencyPair,
    pub settlement_currency: CurrencyCode,
    pub stop_price: Decimal,
    /// Entries in input order, amounts in the settlement currency
    pub entries: Vec<Entry>,
    pub summary: PlanSummary,
}

impl FinalizedPlan {
    pub fn prices(&self) -> Vec<Decimal> {
        self.entries.iter().map(|e| e.price).collect()
    }

    pub fn lot_sizes(&self) -> Vec<Decimal> {
        self.entries.iter().map(|e| e.lot_size).collect()
    }

    pub fn margins(&self) -> Vec<Decimal> {
        self.entries.iter().map(|e| e.margin).collect()
    }

    pub fn profit_losses(&self) -> Vec<Decimal> {
        self.entries.iter().map(|e| e.profit_loss).collect()
    }
}

/// Collects entries for one planning session
pub struct PlanAggregator<'a, R: FxRateReader + ?Sized> {
    rates: &'a R,
    params: PlanParameters,
    daily_swap_per_lot: Decimal,
    entries: Vec<Entry>,
}

impl<'a, R: FxRateReader + ?Sized> PlanAggregator<'a, R> {
    /// Start a plan. The daily swap for one lot is priced up front.
    pub fn new(rates: &'a R, params: PlanParameters) -> Result<Self> {
        let daily_swap_per_lot =
            swap_cost(rates, &params.pair, params.swap_rate, SwapTerms::default())?;

        Ok(Self {
            rates,
            params,
            daily_swap_per_lot,
            entries: Vec::new(),
        })
    }

    pub fn params(&self) -> &PlanParameters {
        &self.params
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn daily_swap_per_lot(&self) -> Decimal {
        self.daily_swap_per_lot
    }

    /// Price an entry at `price` for `lot_size` lots without recording it.
    ///
    /// Amounts that leave the decimal range give `ArithmeticOverflow`.
    pub fn price_entry(&self, price: Decimal, lot_size: Decimal) -> Result<Entry> {
        let params = &self.params;
        let units = checked::mul("units", params.contract_size, lot_size)?;

        let pnl = profit_loss(self.rates, &params.pair, price, params.stop_price, units)?;
        let margin = margin_required(lot_size, params.contract_size, price, params.leverage)?;

        let entry = Entry {
            price,
            lot_size,
            // Losses and gains both count towards exposure
            profit_loss: pnl.round_dp(MONEY_DP).abs(),
            margin: margin.round_dp(MONEY_DP),
        };
        entry.weighted_price()?;
        entry.exposure()?;
        Ok(entry)
    }

    /// Price and append an entry. On error nothing is appended.
    pub fn add_entry(&mut self, price: Decimal, lot_size: Decimal) -> Result<&Entry> {
        let entry = self.price_entry(price, lot_size)?;
        log::debug!(
            "Entry #{} at {} for {} lots: P/L {}, margin {}",
            self.entries.len() + 1,
            entry.price,
            entry.lot_size,
            entry.profit_loss,
            entry.margin
        );
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Convert to the settlement currency and compute the summary
    pub fn finalize(self) -> Result<FinalizedPlan> {
        if self.entries.is_empty() {
            return Err(GamePlanError::EmptyPlan);
        }

        let settlement = CurrencyCode::account();
        let params = self.params;
        let entries = convert_entries(self.rates, self.entries, &params.pair.quote, &settlement)?;

        let total_lot_size = checked::sum("total lot size", entries.iter().map(|e| e.lot_size))?;
        let total_margin = checked::sum("total margin", entries.iter().map(|e| e.margin))?;
        let total_profit_loss =
            checked::sum("total profit/loss", entries.iter().map(|e| e.profit_loss))?;

        let summary = PlanSummary {
            weighted_average_price: weighted_average_price(&entries)?,
            total_margin,
            total_profit_loss,
            total_exposure: checked::add("total exposure", total_profit_loss, total_margin)?,
            total_lot_size,
            pip_distance: pip_distance(&entries, params.stop_price, params.pip_increment)?,
            roe_percent: roe_percent(total_profit_loss, total_margin)?,
            daily_swap_total: checked::mul("daily swap", self.daily_swap_per_lot, total_lot_size)?,
        };

        log::info!(
            "Finalized {} plan with {} entries: exposure {} {}",
            params.pair,
            entries.len(),
            summary.total_exposure,
            settlement
        );

        Ok(FinalizedPlan {
            pair: params.pair,
            settlement_currency: settlement,
            stop_price: params.stop_price,
            entries,
            summary,
        })
    }
}

/// Re-express every entry amount in `settlement` when the quote differs from it
fn convert_entries<R: FxRateReader + ?Sized>(
    rates: &R,
    entries: Vec<Entry>,
    quote: &CurrencyCode,
    settlement: &CurrencyCode,
) -> Result<Vec<Entry>> {
    if quote == settlement {
        return Ok(entries);
    }

    let rate = rates.get_rate(quote, settlement)?;
    entries
        .into_iter()
        .map(|entry| {
            Ok(Entry {
                profit_loss: apply_rate(entry.profit_loss, rate, MONEY_DP)?,
                margin: apply_rate(entry.margin, rate, MONEY_DP)?,
                ..entry
            })
        })
        .collect()
}

/// `sum(price * weight) / sum(weight)` with `weight = lot_size * 100`
pub fn weighted_average_price(entries: &[Entry]) -> Result<Decimal> {
    let weights = entries.iter().map(Entry::weight).collect::<Result<Vec<_>>>()?;
    let weight_sum = checked::sum("weight sum", weights)?;
    if weight_sum.is_zero() {
        return Err(GamePlanError::DivisionByZero(
            "entry weights sum to zero".to_string(),
        ));
    }
    let weighted_prices = entries
        .iter()
        .map(Entry::weighted_price)
        .collect::<Result<Vec<_>>>()?;
    let weighted_price_sum = checked::sum("weighted price sum", weighted_prices)?;
    checked::div("average price", weighted_price_sum, weight_sum)
}

/// Larger of the rounded pip distances from the stop to the highest and lowest entry
pub fn pip_distance(entries: &[Entry], stop_price: Decimal, increment: Decimal) -> Result<Decimal> {
    if increment.is_zero() {
        return Err(GamePlanError::DivisionByZero(
            "minimum price increment must not be zero".to_string(),
        ));
    }

    let max_price = entries.iter().map(|e| e.price).max().ok_or(GamePlanError::EmptyPlan)?;
    let min_price = entries.iter().map(|e| e.price).min().ok_or(GamePlanError::EmptyPlan)?;

    let pips = |price: Decimal| -> Result<Decimal> {
        let distance = checked::sub("pip distance", stop_price, price)?.abs();
        Ok(checked::div("pip distance", distance, increment)?.round())
    };
    Ok(pips(max_price)?.max(pips(min_price)?))
}

/// Return on equity in whole percent
pub fn roe_percent(total_profit_loss: Decimal, total_margin: Decimal) -> Result<Decimal> {
    if total_margin.is_zero() {
        return Err(GamePlanError::DivisionByZero(
            "total margin is zero".to_string(),
        ));
    }
    let ratio = checked::div("roe", total_profit_loss, total_margin)?;
    Ok(checked::mul("roe", ratio, Decimal::ONE_HUNDRED)?.round())
}
