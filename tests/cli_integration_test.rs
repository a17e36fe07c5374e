//! CLI integration tests.
//!
//! Tests cover:
//! - Config loading and strategy/broker config resolution from INI files
//! - Path resolution relative to the config file
//! - A full run over a CSV market data directory with a journaling paper broker
//! - Console summary formatting for completed and halted runs

mod common;

use common::*;
use dcatrader::adapters::file_config_adapter::FileConfigAdapter;
use dcatrader::cli;
use dcatrader::domain::config::build_strategy_config;
use dcatrader::domain::config_validation::validate_broker_config;
use dcatrader::domain::error::DcaError;
use dcatrader::domain::runner::{DcaRunner, RunStatus};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const VALID_INI: &str = r#"
[strategy]
name = Growth Momentum DCA
symbols = NVDA,TSLA,AMD
dca_amount = 100
sma_period = 20
rsi_period = 14
rsi_threshold = 75
volatility_threshold = 25
lookback_days = 30

[market_data]
path = data

[broker]
kind = paper
journal = orders.csv
"#;

fn write_bars(dir: &Path, symbol: &str, closes: &[f64]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for (i, close) in closes.iter().enumerate() {
        let d = today() - chrono::Duration::days((closes.len() - 1 - i) as i64);
        content.push_str(&format!(
            "{},{},{},{},{},1000\n",
            d,
            close,
            close + 1.0,
            close - 1.0,
            close
        ));
    }
    fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}

/// Config + data directory: SPY calm, VIX 14, NVDA rising at $45,
/// TSLA falling, AMD rising but priced above the budget.
fn workspace() -> (TempDir, PathBuf) {
    let root = TempDir::new().unwrap();
    let data = root.path().join("data");
    fs::create_dir(&data).unwrap();

    write_bars(&data, "SPY", &oscillating(30, 500.0));
    write_bars(&data, "NVDA", &rising(30, 35.0));
    write_bars(&data, "TSLA", &falling(30, 200.0));
    write_bars(&data, "AMD", &rising(30, 150.0));
    fs::write(
        data.join("quotes.csv"),
        "symbol,last,ask,bid\nVIX,14.0,,\nNVDA,45.0,45.1,44.9\nTSLA,185.0,,\nAMD,165.0,,\n",
    )
    .unwrap();

    let config_path = root.path().join("dcatrader.ini");
    fs::write(&config_path, VALID_INI).unwrap();
    (root, config_path)
}

mod config_loading {
    use super::*;

    #[test]
    fn load_config_reads_file() {
        let (_root, config_path) = workspace();
        let adapter = cli::load_config(&config_path).unwrap();
        let strategy = build_strategy_config(&adapter).unwrap();
        assert_eq!(strategy.name, "Growth Momentum DCA");
        assert_eq!(strategy.universe, vec!["NVDA", "TSLA", "AMD"]);
        assert!(validate_broker_config(&adapter).is_ok());
    }

    #[test]
    fn load_config_missing_file_fails() {
        assert!(cli::load_config(Path::new("/nonexistent/dcatrader.ini")).is_err());
    }

    #[test]
    fn resolve_path_relative_to_config() {
        let config = Path::new("/etc/dcatrader/dcatrader.ini");
        assert_eq!(
            cli::resolve_path(config, "data"),
            PathBuf::from("/etc/dcatrader/data")
        );
        assert_eq!(
            cli::resolve_path(config, "/srv/market"),
            PathBuf::from("/srv/market")
        );
    }

    #[test]
    fn missing_market_data_directory_is_setup_failure() {
        let root = TempDir::new().unwrap();
        let config_path = root.path().join("dcatrader.ini");
        fs::write(&config_path, VALID_INI).unwrap();
        let adapter = FileConfigAdapter::from_file(&config_path).unwrap();

        let err = cli::build_market_data(&adapter, &config_path).unwrap_err();
        assert!(matches!(err, DcaError::Io(_)));
    }

    #[test]
    fn dry_run_broker_has_no_journal() {
        let (root, config_path) = workspace();
        let adapter = FileConfigAdapter::from_file(&config_path).unwrap();
        let market = cli::build_market_data(&adapter, &config_path).unwrap();
        let broker = cli::build_broker(&adapter, &config_path, today(), true).unwrap();
        let strategy = build_strategy_config(&adapter).unwrap();

        let report = DcaRunner::new(&strategy, &market, &broker).run(today());

        assert_eq!(report.orders_placed(), 1);
        assert_eq!(broker.orders().len(), 1);
        assert!(!root.path().join("orders.csv").exists());
    }
}

mod full_run {
    use super::*;

    #[test]
    fn run_over_csv_data_journals_orders() {
        let (root, config_path) = workspace();
        let adapter = FileConfigAdapter::from_file(&config_path).unwrap();
        let strategy = build_strategy_config(&adapter).unwrap();
        let market = cli::build_market_data(&adapter, &config_path).unwrap();
        let broker = cli::build_broker(&adapter, &config_path, today(), false).unwrap();

        let report = DcaRunner::new(&strategy, &market, &broker).run(today());

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.orders_placed(), 1);
        assert_eq!(report.universe_size, 3);

        let journal = fs::read_to_string(root.path().join("orders.csv")).unwrap();
        assert_eq!(
            journal.lines().collect::<Vec<_>>(),
            vec![
                "id,date,symbol,side,type,quantity",
                "PAPER-000001,2024-06-14,NVDA,buy,market,2",
            ]
        );

        let summary = cli::format_summary(&report, &strategy);
        assert_eq!(summary[0], "=== Growth Momentum DCA - 2024-06-14 ===");
        assert!(summary[1].contains("NVDA:  [BUY] 2 @ ~$45.00 ($90.00) order PAPER-000001"));
        assert!(summary[2].contains("TSLA:  [SKIP] not above SMA(20)"));
        assert!(summary[3].contains("AMD:  [SKIP] $100.00 not enough for 1 share at $165.00"));
        assert_eq!(
            summary.last().unwrap(),
            "DCA complete: 1/3 orders placed, $90.00 committed"
        );
    }

    #[test]
    fn order_ids_continue_across_runs() {
        let (root, config_path) = workspace();
        let adapter = FileConfigAdapter::from_file(&config_path).unwrap();
        let strategy = build_strategy_config(&adapter).unwrap();
        let market = cli::build_market_data(&adapter, &config_path).unwrap();

        for _ in 0..2 {
            let broker = cli::build_broker(&adapter, &config_path, today(), false).unwrap();
            DcaRunner::new(&strategy, &market, &broker).run(today());
        }

        let journal = fs::read_to_string(root.path().join("orders.csv")).unwrap();
        let ids: Vec<&str> = journal
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next())
            .collect();
        assert_eq!(ids, vec!["PAPER-000001", "PAPER-000002"]);
    }

    #[test]
    fn malformed_amount_fails_config() {
        let root = TempDir::new().unwrap();
        let config_path = root.path().join("dcatrader.ini");
        let ini = VALID_INI.replace("dca_amount = 100", "dca_amount = $250");
        fs::write(&config_path, ini).unwrap();
        let adapter = cli::load_config(&config_path).unwrap();
        assert!(matches!(
            build_strategy_config(&adapter),
            Err(DcaError::ConfigInvalid { ref key, .. }) if key == "dca_amount"
        ));
    }

    #[test]
    fn halted_run_summary() {
        let (root, config_path) = workspace();
        let data = root.path().join("data");
        fs::write(
            data.join("quotes.csv"),
            "symbol,last,ask,bid\nVIX,32.5,,\nNVDA,45.0,,\n",
        )
        .unwrap();
        let adapter = FileConfigAdapter::from_file(&config_path).unwrap();
        let strategy = build_strategy_config(&adapter).unwrap();
        let market = cli::build_market_data(&adapter, &config_path).unwrap();
        let broker = cli::build_broker(&adapter, &config_path, today(), false).unwrap();

        let report = DcaRunner::new(&strategy, &market, &broker).run(today());

        assert_eq!(report.status, RunStatus::Halted);
        assert!(!root.path().join("orders.csv").exists());
        let summary = cli::format_summary(&report, &strategy);
        assert_eq!(summary[1], "[HALT] VIX is 32.5 (> 25) - high volatility");
        assert_eq!(summary[2], "DCA skipped: 0/3 orders placed");
    }
}
