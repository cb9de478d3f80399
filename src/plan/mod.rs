//! Averaging plan: entries, input strategies and the aggregation pass

pub mod aggregator;
pub mod entry;

pub use aggregator::{
    pip_distance, roe_percent, weighted_average_price, FinalizedPlan, PlanAggregator,
    PlanParameters, PlanSummary,
};
pub use entry::{Entry, EntryInputStrategy};
