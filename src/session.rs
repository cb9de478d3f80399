//! Interactive console session
//!
//! Walks the user through one plan at a time: lot mode, trade parameters,
//! averaging entries, then the report and optional delivery. Generic over
//! the input and output streams so a whole session can be scripted.

use crate::config::Config;
use crate::currency::{CurrencyCode, CurrencyPair};
use crate::data::fx::FxRateReader;
use crate::error::{GamePlanError, Result};
use crate::plan::{EntryInputStrategy, FinalizedPlan, PlanAggregator, PlanParameters};
use crate::report::{write_report, Report, ReportSink, ReportStyle};
use colored::Colorize;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Line-oriented question and answer over a reader/writer pair
pub struct Prompter<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Prompter<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Give back the output stream
    pub fn into_output(self) -> O {
        self.output
    }

    /// Print one line
    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Print `prompt` and read one trimmed answer.
    ///
    /// End of input is a [`GamePlanError::MalformedInput`].
    pub fn read_answer(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(GamePlanError::MalformedInput(format!(
                "input ended at {:?}",
                prompt.trim()
            )));
        }
        Ok(line.trim().to_string())
    }

    /// Ask until the answer parses as `T`
    pub fn ask<T>(&mut self, prompt: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.ask_checked(prompt, |_| Ok(()))
    }

    /// Ask until the answer parses as `T` and passes `check`
    pub fn ask_checked<T, F>(&mut self, prompt: &str, check: F) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
        F: Fn(&T) -> std::result::Result<(), String>,
    {
        loop {
            let answer = self.read_answer(prompt)?;
            let problem = match answer.parse::<T>() {
                Ok(value) => match check(&value) {
                    Ok(()) => return Ok(value),
                    Err(problem) => problem,
                },
                Err(e) => e.to_string(),
            };
            self.say(format!("Invalid value {:?}: {}", answer, problem))?;
        }
    }

    /// `true` for a Y answer, case-insensitive
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.read_answer(prompt)?.eq_ignore_ascii_case("Y"))
    }
}

fn positive(value: &Decimal) -> std::result::Result<(), String> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err("must be greater than zero".to_string())
    }
}

/// One interactive run over a rate reader
pub struct Session<'a, R: FxRateReader + ?Sized, I, O> {
    rates: &'a R,
    config: &'a Config,
    prompter: Prompter<I, O>,
    sink: Option<&'a dyn ReportSink>,
    style: ReportStyle,
}

impl<'a, R, I, O> Session<'a, R, I, O>
where
    R: FxRateReader + ?Sized,
    I: BufRead,
    O: Write,
{
    pub fn new(rates: &'a R, config: &'a Config, input: I, output: O) -> Self {
        Self {
            rates,
            config,
            prompter: Prompter::new(input, output),
            sink: None,
            style: ReportStyle::Colored,
        }
    }

    /// Offer delivery of each report through `sink`
    pub fn with_sink(mut self, sink: &'a dyn ReportSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_style(mut self, style: ReportStyle) -> Self {
        self.style = style;
        self
    }

    pub fn into_output(self) -> O {
        self.prompter.into_output()
    }

    /// Plan repeatedly until the user quits. Returns the number of reports produced.
    pub fn run(&mut self) -> Result<usize> {
        let mut produced = 0;
        loop {
            if self.plan_once()?.is_some() {
                produced += 1;
            }
            if self
                .prompter
                .read_answer("Enter 'Q' to quit: ")?
                .eq_ignore_ascii_case("Q")
            {
                break;
            }
        }
        log::info!("Session finished after {} report(s)", produced);
        Ok(produced)
    }

    /// One full plan: questions, report and delivery.
    ///
    /// Computation failures are printed and give `Ok(None)`; only input
    /// and output failures are returned as errors.
    pub fn plan_once(&mut self) -> Result<Option<FinalizedPlan>> {
        let Some(strategy) = self.read_strategy()? else {
            return Ok(None);
        };
        let params = self.read_parameters()?;

        let mut aggregator = match PlanAggregator::new(self.rates, params) {
            Ok(aggregator) => aggregator,
            Err(e) => {
                self.show_error(&e)?;
                return Ok(None);
            }
        };
        self.collect_entries(&mut aggregator, &strategy)?;

        let plan = match aggregator.finalize() {
            Ok(plan) => plan,
            Err(e) => {
                self.show_error(&e)?;
                return Ok(None);
            }
        };

        {
            let report = Report::new(&plan);
            self.prompter.say(report.render(self.style))?;
            if self
                .prompter
                .confirm("Do You want to send statistics by e mail? Y/N: ")?
            {
                self.deliver(&report)?;
            }
        }

        Ok(Some(plan))
    }

    fn read_strategy(&mut self) -> Result<Option<EntryInputStrategy>> {
        if self
            .prompter
            .confirm("Do You want to provide custom lot size values Y/N?: ")?
        {
            return Ok(Some(EntryInputStrategy::custom(
                self.config.max_custom_entries,
            )));
        }

        let length = self.config.fibonacci_length;
        let start: usize = self.prompter.ask_checked("Fibo start position: ", |start| {
            if *start < length {
                Ok(())
            } else {
                Err(format!("must be below {}", length))
            }
        })?;
        match EntryInputStrategy::fibonacci(start, length, self.config.unit_lot_size) {
            Ok(strategy) => Ok(Some(strategy)),
            Err(e) => {
                self.show_error(&e)?;
                Ok(None)
            }
        }
    }

    fn read_parameters(&mut self) -> Result<PlanParameters> {
        let pair = self.read_pair()?;
        let contract_size: Decimal = self.prompter.ask_checked("Contract Size: ", positive)?;
        let leverage: Decimal = self.prompter.ask_checked("Leverage: ", positive)?;
        let swap_rate: Decimal = self.prompter.ask("Provide swap rate: ")?;
        let stop_price: Decimal = self.prompter.ask_checked("Stop price: ", positive)?;

        Ok(
            PlanParameters::new(pair, contract_size, leverage, swap_rate, stop_price)
                .with_pip_increment(self.config.pip_increment),
        )
    }

    fn read_pair(&mut self) -> Result<CurrencyPair> {
        let rates = self.rates;
        let account = CurrencyCode::account();
        self.prompter.ask_checked("Pair: ", |pair: &CurrencyPair| {
            if rates.has_rate(&pair.quote, &account) {
                Ok(())
            } else {
                Err(format!("no exchange rate for {}", pair.quote))
            }
        })
    }

    fn collect_entries(
        &mut self,
        aggregator: &mut PlanAggregator<'_, R>,
        strategy: &EntryInputStrategy,
    ) -> Result<()> {
        let max_entries = strategy.max_entries();

        while aggregator.len() < max_entries {
            let price: Decimal = self.prompter.ask_checked("Add averaging price: ", positive)?;
            let lot_size = match strategy.lot_for(aggregator.len()) {
                Some(lot_size) => lot_size,
                None => self.prompter.ask_checked("Add lot size: ", positive)?,
            };

            if let Err(e) = aggregator.add_entry(price, lot_size) {
                self.show_error(&e)?;
                continue;
            }

            if aggregator.len() < max_entries
                && self
                    .prompter
                    .read_answer("Do You want to add another Y/N?: ")?
                    .eq_ignore_ascii_case("N")
            {
                break;
            }
        }

        if aggregator.len() == max_entries {
            self.prompter
                .say(format!("Reached the limit of {} entries", max_entries))?;
        }
        Ok(())
    }

    fn deliver(&mut self, report: &Report<'_>) -> Result<()> {
        let path = self.config.report_path.clone();
        if let Err(e) = write_report(&path, report) {
            self.show_error(&e)?;
            return Ok(());
        }

        let sink = match self.sink {
            Some(sink) => sink,
            None => {
                self.prompter.say(format!(
                    "Email delivery is not configured, report saved to {}",
                    path.display()
                ))?;
                return Ok(());
            }
        };

        let body = format!("Averaging plan for {} attached.", report.plan().pair);
        match sink.deliver(&report.subject(), &body, &path) {
            Ok(()) => self.prompter.say(format!("Report sent via {}", sink.name())),
            Err(e) => {
                log::warn!("Delivery through {} failed: {}", sink.name(), e);
                self.show_error(&e)
            }
        }
    }

    fn show_error(&mut self, error: &GamePlanError) -> Result<()> {
        self.prompter.say(format!("{} {}", "Error:".red().bold(), error))
    }
}
