//! Averaging entries and how their lot sizes are chosen

use crate::error::Result;
use crate::finance::constants::{LOT_WEIGHT_SCALE, MAX_CUSTOM_ENTRIES};
use crate::finance::{checked, fibonacci_lots};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One averaging step of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub price: Decimal,
    pub lot_size: Decimal,
    /// Profit/loss to the stop, always a non-negative magnitude
    pub profit_loss: Decimal,
    pub margin: Decimal,
}

impl Entry {
    /// Weight of this entry in the average price
    pub fn weight(&self) -> Result<Decimal> {
        checked::mul("entry weight", self.lot_size, LOT_WEIGHT_SCALE)
    }

    pub fn weighted_price(&self) -> Result<Decimal> {
        checked::mul("weighted price", self.price, self.weight()?)
    }

    /// Margin plus profit/loss magnitude
    pub fn exposure(&self) -> Result<Decimal> {
        checked::add("exposure", self.margin, self.profit_loss)
    }
}

/// How lot sizes for successive entries are obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryInputStrategy {
    /// Preset lot sizes from the Fibonacci ladder; only prices are asked for
    Fibonacci { lots: Vec<Decimal> },
    /// Every lot size is supplied by the user
    Custom { max_entries: usize },
}

impl EntryInputStrategy {
    /// Fibonacci ladder of `length` lots scaled by `unit`, starting at `start`
    pub fn fibonacci(start: usize, length: usize, unit: Decimal) -> Result<Self> {
        let lots = fibonacci_lots(length, unit)?.into_iter().skip(start).collect();
        Ok(Self::Fibonacci { lots })
    }

    /// Custom lot sizes, capped at `max_entries`
    pub fn custom(max_entries: usize) -> Self {
        Self::Custom { max_entries }
    }

    /// Upper bound on the number of entries
    pub fn max_entries(&self) -> usize {
        match self {
            Self::Fibonacci { lots } => lots.len(),
            Self::Custom { max_entries } => *max_entries,
        }
    }

    /// Preset lot for entry `index`, or `None` when the user must supply it
    pub fn lot_for(&self, index: usize) -> Option<Decimal> {
        match self {
            Self::Fibonacci { lots } => lots.get(index).copied(),
            Self::Custom { .. } => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }
}

/// Custom mode with the standard cap
pub fn default_custom() -> EntryInputStrategy {
    EntryInputStrategy::custom(MAX_CUSTOM_ENTRIES)
}
