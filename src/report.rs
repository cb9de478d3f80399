//! Text report of a finalized plan
//!
//! The same report is rendered two ways: colored for the terminal and plain
//! for the file that gets mailed.

use crate::error::Result;
use crate::finance::constants::{MONEY_DP, PRICE_DP};
use crate::plan::FinalizedPlan;
use crate::statistics::{PlanStatistics, DESCRIPTION_LABELS};
use colored::Colorize;
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const RULE: &str = "------------------------------------------------------------------------";
const COLUMN_WIDTH: usize = 18;

/// Somewhere a finished report can be sent
pub trait ReportSink {
    /// Deliver `body` with the file at `attachment`
    fn deliver(&self, subject: &str, body: &str, attachment: &Path) -> Result<()>;

    /// Get the sink name
    fn name(&self) -> &str;
}

/// How figures are highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    /// Figures in red, for the terminal
    Colored,
    /// No escape codes, for files and mail
    Plain,
}

/// Report over a finalized plan
#[derive(Debug, Clone)]
pub struct Report<'a> {
    plan: &'a FinalizedPlan,
    statistics: PlanStatistics,
}

impl<'a> Report<'a> {
    pub fn new(plan: &'a FinalizedPlan) -> Self {
        Self {
            plan,
            statistics: PlanStatistics::from_plan(plan),
        }
    }

    pub fn plan(&self) -> &FinalizedPlan {
        self.plan
    }

    pub fn statistics(&self) -> &PlanStatistics {
        &self.statistics
    }

    /// Mail subject for this report
    pub fn subject(&self) -> String {
        format!("FX game plan for {}", self.plan.pair)
    }

    /// Render the full report
    pub fn render(&self, style: ReportStyle) -> String {
        let mut out = String::new();
        let pair = &self.plan.pair;

        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "Summary {}: ", pair);
        self.write_entries(&mut out);
        let _ = writeln!(out);
        let _ = writeln!(out, "Summary statistics of trade on {}: ", pair);
        self.write_statistics(&mut out);
        let _ = writeln!(out);
        self.write_summary(&mut out, style);
        let _ = writeln!(out, "{}", RULE);

        out
    }

    fn write_entries(&self, out: &mut String) {
        let headers = [
            "lot_size",
            "margin_value",
            "profit_loss_value",
            "price",
            "weight",
            "weighted_price",
        ];
        let _ = write!(out, "{:>4}", "");
        for header in headers {
            let _ = write!(out, "{:>w$}", header, w = COLUMN_WIDTH);
        }
        let _ = writeln!(out);

        for (i, entry) in self.plan.entries.iter().enumerate() {
            let cells = [
                entry.lot_size.normalize().to_string(),
                money(entry.margin),
                money(entry.profit_loss),
                entry.price.normalize().to_string(),
                decimal_cell(entry.weight()),
                decimal_cell(entry.weighted_price()),
            ];
            let _ = write!(out, "{:>4}", i);
            for cell in cells {
                let _ = write!(out, "{:>w$}", cell, w = COLUMN_WIDTH);
            }
            let _ = writeln!(out);
        }
    }

    fn write_statistics(&self, out: &mut String) {
        let columns = self.statistics.columns();

        let _ = write!(out, "{:>6}", "");
        for (name, _) in columns {
            let _ = write!(out, "{:>w$}", name, w = COLUMN_WIDTH);
        }
        let _ = writeln!(out);

        for (row, label) in DESCRIPTION_LABELS.iter().enumerate() {
            let _ = write!(out, "{:<6}", label);
            for (_, description) in columns {
                let _ = write!(out, "{:>w$.2}", description.values()[row], w = COLUMN_WIDTH);
            }
            let _ = writeln!(out);
        }
    }

    fn write_summary(&self, out: &mut String, style: ReportStyle) {
        let summary = &self.plan.summary;
        let ccy = &self.plan.settlement_currency;
        let hl = |text: String| highlight(text, style);

        let _ = writeln!(
            out,
            "The average price is: {}",
            hl(format!("{:.5}", summary.weighted_average_price.round_dp(PRICE_DP)))
        );
        let _ = writeln!(
            out,
            "The total margin required for this trade will be about: {} {}",
            hl(money(summary.total_exposure)),
            ccy
        );
        let _ = writeln!(out, "which includes {} {} of margin", hl(money(summary.total_margin)), ccy);
        let _ = writeln!(
            out,
            "and {} {} of profit/loss",
            hl(money(summary.total_profit_loss)),
            ccy
        );
        let _ = writeln!(out, "The total lot size is {}", hl(money(summary.total_lot_size)));
        let _ = writeln!(
            out,
            "The total pips distance is {} pips",
            hl(format!("{:.0}", summary.pip_distance))
        );
        let _ = writeln!(out, "The ROE is: {} %", hl(format!("{:.0}", summary.roe_percent)));
        let _ = writeln!(
            out,
            "The daily swap value for sum of lot size is: {} {}",
            hl(money(summary.daily_swap_total)),
            ccy
        );
    }
}

/// Amount rounded half-even to cents, always with two decimals
pub fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(MONEY_DP))
}

/// Derived entry column; a value out of decimal range shows as `-`
fn decimal_cell(value: Result<Decimal>) -> String {
    value.map_or_else(|_| "-".to_string(), |v| v.normalize().to_string())
}

fn highlight(text: String, style: ReportStyle) -> String {
    match style {
        ReportStyle::Colored => text.red().to_string(),
        ReportStyle::Plain => text,
    }
}

/// Write the plain report to `path`, replacing any previous file
pub fn write_report(path: &Path, report: &Report<'_>) -> Result<()> {
    fs::write(path, report.render(ReportStyle::Plain))?;
    log::info!("Report written to {}", path.display());
    Ok(())
}
