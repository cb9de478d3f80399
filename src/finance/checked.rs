//! Overflow-checked decimal arithmetic
//!
//! `Decimal`'s operators panic when a result leaves the 96-bit mantissa.
//! Everything computed from user input goes through these instead.

use crate::error::{GamePlanError, Result};
use rust_decimal::Decimal;

pub fn mul(label: &str, lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| overflow(label, format!("{} * {}", lhs, rhs)))
}

/// Checked division; a zero divisor is `DivisionByZero`
pub fn div(label: &str, lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    if rhs.is_zero() {
        return Err(GamePlanError::DivisionByZero(format!("{}: {} / 0", label, lhs)));
    }
    lhs.checked_div(rhs)
        .ok_or_else(|| overflow(label, format!("{} / {}", lhs, rhs)))
}

pub fn add(label: &str, lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_add(rhs)
        .ok_or_else(|| overflow(label, format!("{} + {}", lhs, rhs)))
}

pub fn sub(label: &str, lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_sub(rhs)
        .ok_or_else(|| overflow(label, format!("{} - {}", lhs, rhs)))
}

/// Sum of `values`, failing on the first overflow
pub fn sum<I>(label: &str, values: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| add(label, total, value))
}

fn overflow(label: &str, expression: String) -> GamePlanError {
    GamePlanError::ArithmeticOverflow(format!("{}: {}", label, expression))
}
