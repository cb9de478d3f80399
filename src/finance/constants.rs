//! Trading constants and defaults
//!
//! Contains default values used by the planner and the interactive session

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Minimum price increment (one pip on a 4-digit quote)
pub const DEFAULT_PIP_INCREMENT: Decimal = dec!(0.0001);

/// Lot size each Fibonacci term is scaled by
pub const DEFAULT_UNIT_LOT_SIZE: Decimal = dec!(0.01);

/// Number of Fibonacci lots offered in the Fibonacci input mode
pub const DEFAULT_FIBONACCI_LENGTH: usize = 15;

/// Maximum number of entries in the custom input mode
pub const MAX_CUSTOM_ENTRIES: usize = 10;

/// Normalization factor for entry weights (weight = lot size * 100)
pub const LOT_WEIGHT_SCALE: Decimal = dec!(100);

/// Decimal places per-entry amounts are rounded to
pub const MONEY_DP: u32 = 2;

/// Decimal places the average price is reported with
pub const PRICE_DP: u32 = 5;
