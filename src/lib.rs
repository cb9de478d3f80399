//! # fx-gameplan
//!
//! Position calculator for averaging into an FX trade.
//!
//! A user plans a series of entries at different prices, each with a lot
//! size (preset from a Fibonacci ladder or chosen freely). For every entry the
//! profit/loss towards a stop price and the required margin are computed,
//! converted to the USD account currency through a live rate snapshot, and
//! summarised into a report that can be mailed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fx_gameplan::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let source = FileRateSource::new("rates.json");
//! let rates = RateProvider::load(&source);
//!
//! let params = PlanParameters::new(
//!     "EURUSD".parse()?,
//!     dec!(100000),
//!     dec!(100),
//!     dec!(-0.5),
//!     dec!(1.09),
//! );
//! let mut plan = PlanAggregator::new(&rates, params)?;
//! plan.add_entry(dec!(1.1000), dec!(0.01))?;
//! plan.add_entry(dec!(1.0950), dec!(0.02))?;
//!
//! let plan = plan.finalize()?;
//! println!("{}", Report::new(&plan).render(ReportStyle::Plain));
//! # Ok::<(), GamePlanError>(())
//! ```

pub mod config;
pub mod currency;
pub mod data;
pub mod error;
pub mod finance;
#[cfg(feature = "email")]
pub mod mail;
pub mod plan;
pub mod report;
pub mod session;
pub mod statistics;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::{Config, MailConfig};
    pub use crate::currency::{CurrencyCode, CurrencyPair, ACCOUNT_CURRENCY};
    pub use crate::data::fx::{FxRateReader, RateProvider, RateTable};
    pub use crate::data::sources::file::FileRateSource;
    pub use crate::data::sources::open_exchange_rates::OpenExchangeRatesSource;
    pub use crate::data::sources::RateSource;
    pub use crate::error::{GamePlanError, Result};
    pub use crate::finance::{fibonacci_lots, margin_required, profit_loss, swap_cost, SwapTerms};
    pub use crate::plan::{
        Entry, EntryInputStrategy, FinalizedPlan, PlanAggregator, PlanParameters, PlanSummary,
    };
    pub use crate::report::{write_report, Report, ReportSink, ReportStyle};
    pub use crate::session::Session;
}
