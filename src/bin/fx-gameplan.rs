//! fx-gameplan CLI - plan averaging entries into an FX position
//!
//! ## Example Usage
//!
//! ```bash
//! # Interactive planning session (live rates, needs OXR_APP_ID)
//! fx-gameplan
//!
//! # Same session against a saved latest.json
//! fx-gameplan --rates-file rates.json plan
//!
//! # One cross rate
//! fx-gameplan rate EUR JPY
//!
//! # Fibonacci lot ladder
//! fx-gameplan fib -n 8 --unit 0.1
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use fx_gameplan::config::{default_config_path, Config};
use fx_gameplan::currency::CurrencyCode;
use fx_gameplan::data::fx::RateProvider;
use fx_gameplan::data::sources::{FileRateSource, OpenExchangeRatesSource, RateSource};
use fx_gameplan::finance::fibonacci_lots;
use fx_gameplan::report::ReportSink;
use fx_gameplan::session::Session;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

/// fx-gameplan: margin, profit/loss and swap for averaging into FX trades
#[derive(Parser)]
#[command(name = "fx-gameplan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Robert Fall")]
#[command(about = "Plan averaging entries into an FX position", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Read rates from a saved latest.json instead of the web
    #[arg(long, global = true, value_name = "PATH")]
    rates_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive planning session (default)
    Plan,

    /// Print the cross rate between two currencies
    Rate {
        /// Base currency, e.g. EUR
        base: String,
        /// Quote currency, e.g. JPY
        quote: String,
    },

    /// Print the Fibonacci lot ladder
    Fib {
        /// Number of rungs
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Lot size of one Fibonacci unit
        #[arg(long)]
        unit: Option<Decimal>,
    },

    /// Show configuration and rate snapshot details
    Info,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());

    if cli.verbose {
        println!(
            "{} v{}",
            "fx-gameplan".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "Report path: {}",
            config.report_path.display().to_string().dimmed()
        );
    }

    let result = match cli.command.unwrap_or(Commands::Plan) {
        Commands::Plan => run_plan(&config, cli.rates_file),
        Commands::Rate { base, quote } => show_rate(&config, cli.rates_file, &base, &quote),
        Commands::Fib { count, unit } => {
            show_ladder(
                count.unwrap_or(config.fibonacci_length),
                unit.unwrap_or(config.unit_lot_size),
            )
        }
        Commands::Info => show_info(&config, cli.config, cli.rates_file),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

/// Pick the rate source from the command line and config
fn rate_source(config: &Config, rates_file: Option<PathBuf>) -> Result<Box<dyn RateSource>> {
    if let Some(path) = rates_file {
        return Ok(Box::new(FileRateSource::new(path)));
    }

    let app_id = config.app_id().ok_or_else(|| {
        anyhow!(
            "no rates app id: set {} or pass --rates-file",
            config.app_id_env
        )
    })?;
    Ok(Box::new(OpenExchangeRatesSource::with_url(
        config.rates_url.as_str(),
        app_id,
    )))
}

/// Fetch the snapshot once, with a spinner while waiting
fn load_rates(config: &Config, rates_file: Option<PathBuf>) -> Result<RateProvider> {
    let source = rate_source(config, rates_file)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Fetching rates from {}", source.name()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let provider = RateProvider::load(source.as_ref());
    spinner.finish_and_clear();

    // Nothing can be planned without rates
    provider.table()?;
    Ok(provider)
}

fn run_plan(config: &Config, rates_file: Option<PathBuf>) -> Result<()> {
    let rates = load_rates(config, rates_file)?;
    let mailer = mail_sink(config);

    let stdin = io::stdin();
    let mut session = Session::new(&rates, config, stdin.lock(), io::stdout());
    if let Some(sink) = mailer.as_deref() {
        session = session.with_sink(sink);
    }

    let produced = session.run().context("planning session aborted")?;
    println!(
        "{} {} report(s) produced",
        "✓".green().bold(),
        produced
    );
    Ok(())
}

#[cfg(feature = "email")]
fn mail_sink(config: &Config) -> Option<Box<dyn ReportSink>> {
    if config.mail.is_configured() {
        Some(Box::new(fx_gameplan::mail::SmtpMailer::new(
            config.mail.clone(),
        )))
    } else {
        None
    }
}

#[cfg(not(feature = "email"))]
fn mail_sink(_config: &Config) -> Option<Box<dyn ReportSink>> {
    None
}

fn show_rate(
    config: &Config,
    rates_file: Option<PathBuf>,
    base: &str,
    quote: &str,
) -> Result<()> {
    let base = CurrencyCode::new(base)?;
    let quote = CurrencyCode::new(quote)?;
    let rates = load_rates(config, rates_file)?;
    let rate = rates.rate(&base, &quote)?;

    println!("{}/{} = {}", base, quote, rate.round_dp(6).normalize().to_string().green());
    Ok(())
}

fn show_ladder(count: usize, unit: Decimal) -> Result<()> {
    let lots = fibonacci_lots(count, unit)?;
    println!(
        "{}",
        format!("Fibonacci ladder, unit {} lots", unit).cyan().bold()
    );
    for (i, lot) in lots.iter().enumerate() {
        println!("  {:>3}  {}", i, lot.normalize());
    }
    Ok(())
}

fn show_info(
    config: &Config,
    config_path: Option<PathBuf>,
    rates_file: Option<PathBuf>,
) -> Result<()> {
    println!(
        "{} {}",
        "fx-gameplan".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();

    println!("{}", "Configuration".bold());
    println!("{}", "=============".dimmed());
    match config_path.or_else(default_config_path) {
        Some(path) => println!("  {} {}", "Config file:".bold(), path.display()),
        None => println!("  {} none", "Config file:".bold()),
    }
    println!("  {} {}", "Rates URL:".bold(), config.rates_url);
    println!(
        "  {} {} ({})",
        "App id variable:".bold(),
        config.app_id_env,
        feature_status(config.app_id().is_some())
    );
    println!("  {} {}", "Pip increment:".bold(), config.pip_increment);
    println!(
        "  {} {} x {}",
        "Fibonacci ladder:".bold(),
        config.fibonacci_length,
        config.unit_lot_size
    );
    println!("  {} {}", "Max custom entries:".bold(), config.max_custom_entries);
    println!("  {} {}", "Report path:".bold(), config.report_path.display());
    println!(
        "  {} {}",
        "Email:".bold(),
        feature_status(cfg!(feature = "email") && config.mail.is_configured())
    );
    println!();

    println!("{}", "Rate snapshot".bold());
    println!("{}", "=============".dimmed());
    match load_rates(config, rates_file) {
        Ok(rates) => {
            let table = rates.table()?;
            if let Some(reference) = table.reference() {
                println!("  {} {}", "Reference:".bold(), reference);
            }
            if let Some(published_at) = table.published_at() {
                println!("  {} {}", "Published:".bold(), published_at.to_rfc3339());
            }
            println!("  {} {}", "Currencies:".bold(), table.len());
            println!(
                "  {} {}",
                "Convertible:".bold(),
                table.convertible_codes().len()
            );
        }
        Err(e) => println!("  {} {:#}", "Unavailable:".yellow().bold(), e),
    }
    println!();

    Ok(())
}

fn feature_status(enabled: bool) -> colored::ColoredString {
    if enabled {
        "enabled".green()
    } else {
        "disabled".red()
    }
}
