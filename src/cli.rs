//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvMarketData;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::paper_broker::PaperBroker;
use crate::domain::config::{build_strategy_config, StrategyConfig};
use crate::domain::config_validation::{
    validate_broker_config, BROKER_SECTION, MARKET_DATA_SECTION,
};
use crate::domain::error::DcaError;
use crate::domain::indicator::Indicator;
use crate::domain::runner::{DcaRunner, RunReport, RunStatus, SkipReason, SymbolOutcome};
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(
    name = "dcatrader",
    about = "Dollar-cost averaging with trend and market-risk filters"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one DCA cycle
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Trading date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Evaluate and size orders without journaling them
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file and print the resolved settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            date,
            dry_run,
        } => run_cycle(&config, date, dry_run),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Relative paths in the config are resolved against the config file's directory.
pub fn resolve_path(config_path: &Path, value: &str) -> PathBuf {
    let candidate = PathBuf::from(value.trim());
    if candidate.is_absolute() {
        return candidate;
    }
    config_path
        .parent()
        .map(|dir| dir.join(&candidate))
        .unwrap_or(candidate)
}

pub fn build_market_data(
    config: &dyn ConfigPort,
    config_path: &Path,
) -> Result<CsvMarketData, DcaError> {
    let path = config
        .get_string(MARKET_DATA_SECTION, "path")
        .ok_or_else(|| DcaError::ConfigMissing {
            section: MARKET_DATA_SECTION.to_string(),
            key: "path".to_string(),
        })?;
    CsvMarketData::connect(resolve_path(config_path, &path))
}

pub fn build_broker(
    config: &dyn ConfigPort,
    config_path: &Path,
    trade_date: NaiveDate,
    dry_run: bool,
) -> Result<PaperBroker, DcaError> {
    let broker = PaperBroker::new(trade_date);
    if dry_run {
        return Ok(broker);
    }
    match config
        .get_string(BROKER_SECTION, "journal")
        .filter(|j| !j.trim().is_empty())
    {
        Some(journal) => broker.with_journal(resolve_path(config_path, &journal)),
        None => Ok(broker),
    }
}

fn run_cycle(config_path: &Path, date: Option<NaiveDate>, dry_run: bool) -> ExitCode {
    info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let strategy = match build_strategy_config(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = validate_broker_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let today = date.unwrap_or_else(|| Local::now().date_naive());

    // Setup failures are fatal: there is nothing to run without market data.
    let market = match build_market_data(&adapter, config_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let broker = match build_broker(&adapter, config_path, today, dry_run) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if dry_run {
        info!("dry run: orders go to an in-memory paper broker");
    }

    let report = DcaRunner::new(&strategy, &market, &broker).run(today);
    print_summary(&report, &strategy);
    ExitCode::SUCCESS
}

pub fn format_summary(report: &RunReport, strategy: &StrategyConfig) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("=== {} - {} ===", report.strategy, report.date));

    if report.status == RunStatus::Halted {
        let reason = report
            .market_risk
            .reason(strategy)
            .unwrap_or_else(|| "market risk elevated".to_string());
        lines.push(format!("[HALT] {}", reason));
        lines.push(format!("DCA skipped: 0/{} orders placed", report.universe_size));
        return lines;
    }

    for entry in &report.symbols {
        let line = match &entry.outcome {
            SymbolOutcome::Bought {
                order_id,
                quantity,
                price,
            } => format!(
                "  {}:  [BUY] {} @ ~${:.2} (${:.2}) order {}",
                entry.symbol,
                quantity,
                price,
                *quantity as f64 * price,
                order_id
            ),
            SymbolOutcome::Skipped(SkipReason::NotInUptrend(outcome)) => format!(
                "  {}:  [SKIP] not above {} ({})",
                entry.symbol,
                Indicator::Sma(strategy.sma_period),
                outcome
            ),
            SymbolOutcome::Skipped(SkipReason::BudgetBelowOneShare { price }) => format!(
                "  {}:  [SKIP] ${:.2} not enough for 1 share at ${:.2}",
                entry.symbol, strategy.dca_amount, price
            ),
            SymbolOutcome::Errored(reason) => {
                format!("  {}:  [ERROR] {}", entry.symbol, reason)
            }
        };
        lines.push(line);
    }

    lines.push(format!(
        "DCA complete: {}/{} orders placed, ${:.2} committed",
        report.orders_placed(),
        report.universe_size,
        report.dollars_committed()
    ));
    lines
}

fn print_summary(report: &RunReport, strategy: &StrategyConfig) {
    eprintln!();
    for line in format_summary(report, strategy) {
        eprintln!("{}", line);
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let strategy = match build_strategy_config(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = validate_broker_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let priority: Vec<String> = strategy.price_priority.iter().map(|p| p.to_string()).collect();

    eprintln!("\nStrategy: {}", strategy.name);
    eprintln!("  universe:        {}", strategy.universe.join(", "));
    eprintln!("  dca amount:      ${:.2} per qualifying symbol", strategy.dca_amount);
    eprintln!("  trend filter:    close > {}", Indicator::Sma(strategy.sma_period));
    eprintln!(
        "  risk filter:     {} {} > {} or {} > {}",
        strategy.benchmark,
        Indicator::Rsi(strategy.rsi_period),
        strategy.rsi_threshold,
        strategy.volatility_index,
        strategy.volatility_threshold
    );
    eprintln!(
        "  lookback:        {} days (+{} padding)",
        strategy.lookback_days, strategy.lookback_padding_days
    );
    eprintln!("  price priority:  {}", priority.join(" -> "));
    if let Some(path) = adapter.get_string(MARKET_DATA_SECTION, "path") {
        eprintln!("  market data:     {}", resolve_path(config_path, &path).display());
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
