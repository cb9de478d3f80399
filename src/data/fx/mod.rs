//! Foreign Exchange (FX) rate system
//!
//! Provides the live rate snapshot and currency conversion for the planner.
//!
//! # Components
//!
//! - **base**: the `FxRateReader` trait
//! - **rate_table**: `RateTable` snapshot and the `RateProvider` built from it
//! - **utils**: amount conversion helpers
//!
//! # Example
//!
//! ```rust
//! use fx_gameplan::currency::CurrencyCode;
//! use fx_gameplan::data::fx::{FxRateReader, RateProvider, RateTable};
//! use rust_decimal_macros::dec;
//!
//! let table = RateTable::from_codes([("USD", dec!(1)), ("EUR", dec!(0.8))]).unwrap();
//! let provider = RateProvider::new(table);
//!
//! let eur = CurrencyCode::new("EUR").unwrap();
//! let usd = CurrencyCode::account();
//! assert_eq!(provider.get_rate(&eur, &usd).unwrap(), dec!(1.25));
//! ```

pub mod base;
pub mod rate_table;
pub mod utils;

pub use base::FxRateReader;
pub use rate_table::{RateProvider, RateTable};
pub use utils::{apply_rate, convert_amount, convert_amounts};
