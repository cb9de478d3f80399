//! Integration tests for the FX rate system
//!
//! Loads snapshots through the sources and checks cross rates and
//! conversions the way the planner uses them.

use fx_gameplan::currency::CurrencyCode;
use fx_gameplan::data::fx::{convert_amount, convert_amounts, FxRateReader, RateProvider, RateTable};
use fx_gameplan::data::sources::{FileRateSource, OpenExchangeRatesSource, RateSource};
use fx_gameplan::error::GamePlanError;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

const SNAPSHOT: &str = r#"{
    "disclaimer": "Usage subject to terms",
    "license": "https://openexchangerates.org/license",
    "timestamp": 1700000000,
    "base": "USD",
    "rates": {
        "USD": 1,
        "EUR": 0.8,
        "GBP": 0.75,
        "JPY": 150,
        "CHF": 0.9,
        "XAU": 0.0005
    }
}"#;

fn code(s: &str) -> CurrencyCode {
    CurrencyCode::new(s).unwrap()
}

fn snapshot_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", SNAPSHOT).unwrap();
    file
}

#[test]
fn test_snapshot_from_file() {
    let file = snapshot_file();
    let provider = RateProvider::load(&FileRateSource::new(file.path()));

    assert!(provider.is_ready());
    let table = provider.table().unwrap();
    assert_eq!(table.len(), 6);
    assert_eq!(table.reference(), Some(&code("USD")));
    assert_eq!(table.published_at().unwrap().timestamp(), 1700000000);
}

#[test]
fn test_cross_rates_from_snapshot() {
    let file = snapshot_file();
    let provider = RateProvider::load(&FileRateSource::new(file.path()));

    assert_eq!(provider.rate(&code("EUR"), &code("USD")).unwrap(), dec!(1.25));
    assert_eq!(provider.rate(&code("USD"), &code("JPY")).unwrap(), dec!(150));
    assert_eq!(provider.rate(&code("EUR"), &code("JPY")).unwrap(), dec!(187.5));
    assert_eq!(provider.rate(&code("GBP"), &code("GBP")).unwrap(), Decimal::ONE);
}

#[test]
fn test_special_codes_priced_but_not_convertible() {
    let file = snapshot_file();
    let provider = RateProvider::load(&FileRateSource::new(file.path()));

    assert_eq!(provider.rate(&code("XAU"), &code("USD")).unwrap(), dec!(2000));
    assert!(!provider.is_convertible(&code("XAU")).unwrap());
    assert!(provider.is_convertible(&code("EUR")).unwrap());
    assert!(!provider.is_convertible(&code("SEK")).unwrap());
}

#[test]
fn test_unknown_currency() {
    let file = snapshot_file();
    let provider = RateProvider::load(&FileRateSource::new(file.path()));

    let err = provider.rate(&code("SEK"), &code("USD")).unwrap_err();
    assert!(matches!(err, GamePlanError::UnknownCurrency(ref c) if c == "SEK"));
}

#[test]
fn test_failed_fetch_blocks_every_rate() {
    let provider = RateProvider::load(&FileRateSource::new("/no/such/rates.json"));

    assert!(!provider.is_ready());
    for (base, quote) in [("EUR", "USD"), ("USD", "USD"), ("JPY", "GBP")] {
        let err = provider.rate(&code(base), &code(quote)).unwrap_err();
        assert!(matches!(err, GamePlanError::RateUnavailable(_)));
    }
    assert!(matches!(
        provider.is_convertible(&code("EUR")),
        Err(GamePlanError::RateUnavailable(_))
    ));
}

#[test]
fn test_malformed_snapshot_is_unavailable() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"base": "USD", "rates": {{}}}}"#).unwrap();

    let err = FileRateSource::new(file.path()).fetch().unwrap_err();
    assert!(matches!(err, GamePlanError::RateUnavailable(_)));
}

#[test]
fn test_http_source_unreachable() {
    let source = OpenExchangeRatesSource::with_url("http://127.0.0.1:9/latest.json", "id");
    let provider = RateProvider::load(&source);
    assert!(matches!(
        provider.rate(&code("EUR"), &code("USD")),
        Err(GamePlanError::RateUnavailable(_))
    ));
}

#[test]
fn test_conversion_chain() {
    let file = snapshot_file();
    let provider = RateProvider::load(&FileRateSource::new(file.path()));

    let jpy = convert_amount(&provider, dec!(100), &code("GBP"), &code("JPY")).unwrap();
    assert_eq!(jpy, dec!(20000));
    let usd = convert_amount(&provider, jpy, &code("JPY"), &code("USD")).unwrap();
    assert!((usd - dec!(133.3333333333)).abs() < dec!(0.0000001));

    let batch = convert_amounts(&provider, &[dec!(10), dec!(20)], &code("EUR"), &code("USD")).unwrap();
    assert_eq!(batch, vec![dec!(12.5), dec!(25)]);
}

fn rate_value() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000i64).prop_map(|mantissa| Decimal::new(mantissa, 6))
}

proptest! {
    #[test]
    fn prop_rate_to_self_is_one(value in rate_value()) {
        let table = RateTable::from_codes([("USD", Decimal::ONE), ("AAA", value)]).unwrap();
        let provider = RateProvider::new(table);
        prop_assert_eq!(provider.rate(&code("AAA"), &code("AAA")).unwrap(), Decimal::ONE);
    }

    #[test]
    fn prop_rate_times_inverse_is_one(a in rate_value(), b in rate_value()) {
        let table = RateTable::from_codes([("AAA", a), ("BBB", b)]).unwrap();
        let provider = RateProvider::new(table);

        let there = provider.rate(&code("AAA"), &code("BBB")).unwrap();
        let back = provider.rate(&code("BBB"), &code("AAA")).unwrap();
        prop_assert!((there * back - Decimal::ONE).abs() < dec!(0.000000000001));
    }

    #[test]
    fn prop_inverse_rate_matches_reverse(a in rate_value(), b in rate_value()) {
        let table = RateTable::from_codes([("AAA", a), ("BBB", b)]).unwrap();
        let provider = RateProvider::new(table);

        let inverse = provider.get_inverse_rate(&code("AAA"), &code("BBB")).unwrap();
        let direct = provider.get_rate(&code("AAA"), &code("BBB")).unwrap();
        prop_assert!((inverse - direct).abs() <= direct.abs() * dec!(0.000000000001));
    }
}
