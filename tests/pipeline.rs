// End-to-end session over the synthetic feed with everything seeded.
use paperpilot::config::{AppConfig, FeedConfig, RiskConfig};
use paperpilot::core::engine::Orchestrator;
use paperpilot::feeds::lighthouse::LighthouseSignals;
use paperpilot::feeds::synthetic::SyntheticFeed;
use paperpilot::feeds::traits::SnapshotProducer;
use paperpilot::storage::Journal;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tokio::sync::mpsc;

fn test_config(journal: &PathBuf, summary: &PathBuf, ticks: u64, seed: u64) -> AppConfig {
    AppConfig {
        symbol: "BTCUSDT".to_string(),
        seed: Some(seed),
        journal_path: journal.display().to_string(),
        summary_path: summary.display().to_string(),
        log_dir: "logs".to_string(),
        risk: RiskConfig {
            max_portfolio_risk: 0.03,
            max_leverage: 5.0,
            circuit_breaker: 0.10,
            initial_equity: Decimal::from(100_000),
        },
        feed: FeedConfig {
            base_price: Decimal::from(50_000),
            volatility: 0.004,
            tick_size: Decimal::new(1, 2),
            lot_step: Decimal::new(1, 5),
            tick_interval_ms: 1,
            ticks,
            venues: vec![
                "binance".to_string(),
                "kraken".to_string(),
                "coinbase".to_string(),
            ],
        },
    }
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("paperpilot-it-{}-{}", std::process::id(), name))
}

async fn run_session(ticks: u64, seed: u64, tag: &str) -> paperpilot::core::engine::SessionSummary {
    let journal_path = scratch(&format!("{tag}.jsonl"));
    let summary_path = scratch(&format!("{tag}.json"));
    let _ = tokio::fs::remove_file(&journal_path).await;
    let config = test_config(&journal_path, &summary_path, ticks, seed);
    config.validate().expect("test config is valid");

    let (tx, rx) = mpsc::channel(100);
    let mut feed = SyntheticFeed::new(config.symbol.clone(), config.feed.clone(), config.seed);
    feed.subscribe(tx).await.unwrap();

    let signals = LighthouseSignals::with_seed(seed.wrapping_add(2));
    let journal = Journal::new(&journal_path);
    let mut orchestrator = Orchestrator::new(&config, signals, rx, journal);
    let summary = orchestrator.run().await.unwrap();

    // One journal record per tick, each valid JSON.
    let body = tokio::fs::read_to_string(&journal_path).await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), ticks as usize);
    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["symbol"], "BTCUSDT");
    }

    let _ = tokio::fs::remove_file(&journal_path).await;
    summary
}

#[tokio::test]
async fn seeded_session_runs_to_completion() {
    let summary = run_session(120, 42, "complete").await;

    assert_eq!(summary.ticks, 120);
    assert!(summary.total_trades > 0, "a 35/35/30 mix should trade");
    assert!(summary.wins <= summary.total_trades);
    assert!(summary.win_rate >= 0.0 && summary.win_rate <= 1.0);
    assert!(summary.max_equity_drawdown >= 0.0);
    assert!(summary.max_trade_drawdown >= 0.0);
    assert!(summary.sharpe.is_finite());
}

#[tokio::test]
async fn same_seed_reproduces_the_session() {
    let first = run_session(80, 7, "replay-a").await;
    let second = run_session(80, 7, "replay-b").await;

    assert_eq!(first.total_trades, second.total_trades);
    assert_eq!(first.wins, second.wins);
    assert_eq!(first.equity, second.equity);
    assert_eq!(first.realized_pnl, second.realized_pnl);
}
