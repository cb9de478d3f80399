//! Finance module - trade arithmetic and defaults

pub mod checked;
pub mod constants;
pub mod trade_math;

pub use trade_math::{fibonacci_lots, margin_required, profit_loss, swap_cost, SwapTerms};
