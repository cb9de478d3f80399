//! End-to-end planning: rates from a file, entries through the
//! aggregator, then the report and a scripted console session.

use fx_gameplan::config::Config;
use fx_gameplan::currency::{CurrencyCode, CurrencyPair};
use fx_gameplan::data::fx::{RateProvider, RateTable};
use fx_gameplan::data::sources::FileRateSource;
use fx_gameplan::error::GamePlanError;
use fx_gameplan::finance::{fibonacci_lots, margin_required, profit_loss};
use fx_gameplan::plan::{
    pip_distance, roe_percent, weighted_average_price, Entry, PlanAggregator, PlanParameters,
};
use fx_gameplan::report::{write_report, Report, ReportStyle};
use fx_gameplan::session::Session;
use fx_gameplan::statistics::PlanStatistics;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

fn provider() -> RateProvider {
    RateProvider::new(
        RateTable::from_codes([
            ("USD", dec!(1)),
            ("EUR", dec!(0.8)),
            ("GBP", dec!(0.75)),
            ("JPY", dec!(150)),
            ("XAU", dec!(0.0005)),
        ])
        .unwrap(),
    )
}

fn pair(s: &str) -> CurrencyPair {
    s.parse().unwrap()
}

fn entry(price: Decimal, lot_size: Decimal) -> Entry {
    Entry {
        price,
        lot_size,
        profit_loss: Decimal::ZERO,
        margin: Decimal::ZERO,
    }
}

#[test]
fn test_eurusd_profit_loss() {
    let rates = provider();
    let pnl = profit_loss(&rates, &pair("EURUSD"), dec!(1.1000), dec!(1.1050), dec!(100000)).unwrap();
    assert_eq!(pnl, dec!(625));
}

#[test]
fn test_metal_profit_loss_not_converted() {
    let rates = provider();
    let pnl = profit_loss(&rates, &pair("XAUUSD"), dec!(2000), dec!(1990), dec!(100)).unwrap();
    assert_eq!(pnl, dec!(-1000));
}

#[test]
fn test_margin_required() {
    assert_eq!(
        margin_required(dec!(1), dec!(100000), dec!(1.1), dec!(100)).unwrap(),
        dec!(1100)
    );
    assert!(matches!(
        margin_required(dec!(1), dec!(100000), dec!(1.1), dec!(0)),
        Err(GamePlanError::DivisionByZero(_))
    ));
}

#[test]
fn test_fibonacci_ladder() {
    assert_eq!(
        fibonacci_lots(5, dec!(1)).unwrap(),
        vec![dec!(1), dec!(1), dec!(2), dec!(3), dec!(5)]
    );
    assert_eq!(fibonacci_lots(15, dec!(0.01)).unwrap()[14], dec!(6.10));
}

#[test]
fn test_no_rates_no_plan() {
    let rates = RateProvider::unavailable("connection refused");
    assert!(matches!(
        profit_loss(&rates, &pair("EURUSD"), dec!(1.1), dec!(1.2), dec!(1000)),
        Err(GamePlanError::RateUnavailable(_))
    ));

    let params = PlanParameters::new(pair("XAUUSD"), dec!(100), dec!(10), dec!(0), dec!(1900));
    assert!(matches!(
        PlanAggregator::new(&rates, params),
        Err(GamePlanError::RateUnavailable(_))
    ));
}

#[test]
fn test_oversized_contract_is_an_error_not_a_panic() {
    let rates = provider();
    let params = PlanParameters::new(
        pair("EURUSD"),
        dec!(10000000000000000000000),
        dec!(100),
        dec!(0),
        dec!(1.09),
    );
    let mut plan = PlanAggregator::new(&rates, params).unwrap();
    assert!(matches!(
        plan.add_entry(dec!(100000), dec!(100000)),
        Err(GamePlanError::ArithmeticOverflow(_))
    ));
    assert!(plan.is_empty());
}

#[test]
fn test_weighted_average_and_pips() {
    let entries = [entry(dec!(1.10), dec!(0.01)), entry(dec!(1.20), dec!(0.01))];
    assert_eq!(weighted_average_price(&entries).unwrap(), dec!(1.15));

    let entries = [entry(dec!(1.1000), dec!(0.01)), entry(dec!(1.0950), dec!(0.01))];
    assert_eq!(
        pip_distance(&entries, dec!(1.1050), dec!(0.0001)).unwrap(),
        dec!(100)
    );
    assert_eq!(
        pip_distance(&entries[..1], dec!(1.0950), dec!(0.0001)).unwrap(),
        dec!(50)
    );
}

#[test]
fn test_roe_with_zero_margin() {
    assert!(matches!(
        roe_percent(dec!(10), Decimal::ZERO),
        Err(GamePlanError::DivisionByZero(_))
    ));
}

#[test]
fn test_gbpjpy_plan_converted_to_usd() {
    let rates = provider();
    let params = PlanParameters::new(pair("GBPJPY"), dec!(100000), dec!(100), dec!(-2), dec!(190));
    let mut aggregator = PlanAggregator::new(&rates, params).unwrap();
    aggregator.add_entry(dec!(191), dec!(0.01)).unwrap();
    aggregator.add_entry(dec!(192), dec!(0.02)).unwrap();

    let plan = aggregator.finalize().unwrap();
    assert_eq!(plan.settlement_currency.as_str(), "USD");

    // Entry 1: 1000 units * 1 JPY * 200 = 200000 JPY; margin 1910 JPY
    assert_eq!(plan.entries[0].profit_loss, dec!(1333.33));
    assert_eq!(plan.entries[0].margin, dec!(12.73));
    // Entry 2: 2000 units * 2 JPY * 200 = 800000 JPY; margin 3840 JPY
    assert_eq!(plan.entries[1].profit_loss, dec!(5333.33));
    assert_eq!(plan.entries[1].margin, dec!(25.60));

    assert_eq!(plan.summary.total_profit_loss, dec!(6666.66));
    assert_eq!(plan.summary.total_margin, dec!(38.33));
    assert_eq!(plan.summary.total_lot_size, dec!(0.03));
    assert_eq!(plan.summary.pip_distance, dec!(20000));
}

#[test]
fn test_empty_plan() {
    let rates = provider();
    let params = PlanParameters::new(pair("EURUSD"), dec!(100000), dec!(100), dec!(0), dec!(1.09));
    let aggregator = PlanAggregator::new(&rates, params).unwrap();
    assert!(matches!(aggregator.finalize(), Err(GamePlanError::EmptyPlan)));
}

#[test]
fn test_failed_entry_leaves_plan_unchanged() {
    let rates = provider();
    let params = PlanParameters::new(pair("EURUSD"), dec!(100000), dec!(0), dec!(0), dec!(1.09));
    let mut aggregator = PlanAggregator::new(&rates, params).unwrap();

    assert!(aggregator.add_entry(dec!(1.1), dec!(0.01)).is_err());
    assert!(aggregator.is_empty());
}

#[test]
fn test_report_file_and_statistics() {
    let rates = provider();
    let params = PlanParameters::new(pair("EURUSD"), dec!(100000), dec!(100), dec!(-0.5), dec!(1.09));
    let mut aggregator = PlanAggregator::new(&rates, params).unwrap();
    for (price, lot) in [(dec!(1.10), dec!(0.01)), (dec!(1.11), dec!(0.01)), (dec!(1.12), dec!(0.02))] {
        aggregator.add_entry(price, lot).unwrap();
    }
    let plan = aggregator.finalize().unwrap();

    let stats = PlanStatistics::from_plan(&plan);
    assert_eq!(stats.price.count, 3);
    assert!((stats.lot_size.max - 0.02).abs() < 1e-12);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.txt");
    write_report(&path, &Report::new(&plan)).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    assert!(text.contains("Summary EURUSD: "));
    assert!(text.contains("The total lot size is 0.04"));
    assert!(text.contains("The total pips distance is 300 pips"));
}

#[test]
fn test_scripted_session_over_rates_file() {
    let mut rates_file = NamedTempFile::new().unwrap();
    write!(
        rates_file,
        r#"{{"base": "USD", "timestamp": 1700000000, "rates": {{"USD": 1, "EUR": 0.8}}}}"#
    )
    .unwrap();
    let rates = RateProvider::load(&FileRateSource::new(rates_file.path()));
    let config = Config::default();

    let script = "N\n0\neurusd\n100000\n100\n-0.5\n1.09\n1.1\nY\n1.095\nN\nN\nQ\n";
    let mut session = Session::new(&rates, &config, Cursor::new(script), Vec::new())
        .with_style(ReportStyle::Plain);
    assert_eq!(session.run().unwrap(), 1);

    let output = String::from_utf8(session.into_output()).unwrap();
    assert!(output.contains("Summary EURUSD: "));
    assert!(output.contains("which includes 21.95 USD of margin"));
    assert!(output.contains("and 18.75 USD of profit/loss"));
    assert!(output.contains("The ROE is: 85 %"));
}

/// GBPJPY quotes from 150.00 to 250.00
fn price() -> impl Strategy<Value = Decimal> {
    (15_000i64..=25_000i64).prop_map(|p| Decimal::new(p, 2))
}

/// 0.01 to 1.00 lots
fn lot() -> impl Strategy<Value = Decimal> {
    (1i64..=100i64).prop_map(|l| Decimal::new(l, 2))
}

proptest! {
    #[test]
    fn prop_fibonacci_recurrence(n in 3usize..40) {
        let lots = fibonacci_lots(n, Decimal::ONE).unwrap();
        prop_assert_eq!(lots.len(), n);
        for i in 2..n {
            prop_assert_eq!(lots[i], lots[i - 1] + lots[i - 2]);
        }
    }

    #[test]
    fn prop_weighted_average_within_range(
        prices in proptest::collection::vec(1i64..300_000i64, 1..10),
        lots in proptest::collection::vec(1i64..100i64, 10),
    ) {
        let entries: Vec<Entry> = prices
            .iter()
            .zip(lots.iter())
            .map(|(p, l)| entry(Decimal::new(*p, 5), Decimal::new(*l, 2)))
            .collect();
        let wap = weighted_average_price(&entries).unwrap();
        let min = entries.iter().map(|e| e.price).min().unwrap();
        let max = entries.iter().map(|e| e.price).max().unwrap();
        prop_assert!(wap >= min && wap <= max);
    }

    #[test]
    fn prop_conversion_distributes_over_sums(
        steps in proptest::collection::vec((price(), lot()), 1..12),
    ) {
        let rates = provider();
        let params = PlanParameters::new(
            pair("GBPJPY"),
            dec!(100000),
            dec!(100),
            dec!(-2.5),
            dec!(185.00),
        )
        .with_pip_increment(dec!(0.01));
        let mut plan = PlanAggregator::new(&rates, params).unwrap();
        for (price, lot) in &steps {
            plan.add_entry(*price, *lot).unwrap();
        }

        let quote_pl: Decimal = plan.entries().iter().map(|e| e.profit_loss).sum();
        let quote_margin: Decimal = plan.entries().iter().map(|e| e.margin).sum();
        let to_usd = rates
            .rate(&CurrencyCode::new("JPY").unwrap(), &CurrencyCode::account())
            .unwrap();

        let summary = plan.finalize().unwrap().summary;
        let tolerance = dec!(0.01) * Decimal::from(steps.len());
        prop_assert!((summary.total_profit_loss - quote_pl * to_usd).abs() <= tolerance);
        prop_assert!((summary.total_margin - quote_margin * to_usd).abs() <= tolerance);
    }
}
