//! Descriptive statistics over the plan's entry columns
//!
//! Display-only: values are converted to `f64` here and never flow back
//! into the decimal figures of the plan.

use crate::plan::FinalizedPlan;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// count/mean/std/min/quartiles/max of one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (NaN for fewer than two values)
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl Description {
    /// Values in display order: count, mean, std, min, 25%, 50%, 75%, max
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// Row labels matching [`Description::values`]
pub const DESCRIPTION_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Describe a column of values
pub fn describe(values: &[f64]) -> Description {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Description {
        count: values.len(),
        mean: Statistics::mean(values.iter()),
        std: Statistics::std_dev(values.iter()),
        min: Statistics::min(values.iter()),
        q25: linear_quantile(&sorted, 0.25),
        q50: linear_quantile(&sorted, 0.5),
        q75: linear_quantile(&sorted, 0.75),
        max: Statistics::max(values.iter()),
    }
}

/// Quantile of sorted values, interpolating linearly between the two
/// nearest ranks at position `(n - 1) * p`. NaN when empty.
fn linear_quantile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = (sorted.len() - 1) as f64 * p;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    sorted[lower] + (position - lower as f64) * (sorted[upper] - sorted[lower])
}

/// Describe a column of decimals
pub fn describe_decimals(values: &[Decimal]) -> Description {
    let floats: Vec<f64> = values
        .iter()
        .map(|value| value.to_f64().unwrap_or(f64::NAN))
        .collect();
    describe(&floats)
}

/// Descriptions of the four entry columns of a plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanStatistics {
    pub lot_size: Description,
    pub margin: Description,
    pub profit_loss: Description,
    pub price: Description,
}

impl PlanStatistics {
    pub fn from_plan(plan: &FinalizedPlan) -> Self {
        Self {
            lot_size: describe_decimals(&plan.lot_sizes()),
            margin: describe_decimals(&plan.margins()),
            profit_loss: describe_decimals(&plan.profit_losses()),
            price: describe_decimals(&plan.prices()),
        }
    }

    /// Column name and description, in report order
    pub fn columns(&self) -> [(&'static str, &Description); 4] {
        [
            ("lot_size", &self.lot_size),
            ("margin_value", &self.margin),
            ("profit_loss_value", &self.profit_loss),
            ("price", &self.price),
        ]
    }
}
