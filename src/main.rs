// src/main.rs
use dotenvy::dotenv;
use paperpilot::config::AppConfig;
use paperpilot::core::engine::{Orchestrator, SessionSummary};
use paperpilot::feeds::lighthouse::LighthouseSignals;
use paperpilot::feeds::synthetic::SyntheticFeed;
use paperpilot::feeds::traits::SnapshotProducer;
use paperpilot::storage::{self, Journal};
use paperpilot::utils::logging;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Fail fast on bad risk parameters before anything is wired up.
    let config = AppConfig::load()?;
    let _log_guard = logging::init(&config.log_dir);

    println!("========================================");
    println!("       PAPERPILOT SIM - v0.1.0");
    println!("========================================");
    println!("Symbol: {}", config.symbol);
    println!("Ticks:  {}", config.feed.ticks);
    println!(
        "Seed:   {}",
        config
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "os entropy".to_string())
    );
    println!("========================================");

    let (snapshot_tx, snapshot_rx) = mpsc::channel(100);

    let mut feed = SyntheticFeed::new(config.symbol.clone(), config.feed.clone(), config.seed);
    feed.subscribe(snapshot_tx).await?;

    let signals = match config.seed {
        Some(seed) => LighthouseSignals::with_seed(seed.wrapping_add(2)),
        None => LighthouseSignals::new(),
    };
    let journal = Journal::new(&config.journal_path);

    let mut orchestrator = Orchestrator::new(&config, signals, snapshot_rx, journal);
    let summary = orchestrator.run().await?;

    print_status(&summary);

    if let Err(error) = storage::write_summary(Path::new(&config.summary_path), &summary).await {
        warn!(%error, "could not persist session summary");
    } else {
        println!("Summary -> {}", config.summary_path);
    }

    Ok(())
}

fn print_status(summary: &SessionSummary) {
    println!();
    println!("{}", "=".repeat(50));
    println!("SESSION SUMMARY - {}", summary.symbol);
    println!("{}", "=".repeat(50));
    println!("Ticks:            {}", summary.ticks);
    println!(
        "Trades:           {} ({}W/{}L)",
        summary.total_trades,
        summary.wins,
        summary.total_trades - summary.wins
    );
    println!("Win Rate:         {:.1}%", summary.win_rate * 100.0);
    println!("Realized PnL:     {:.2}", summary.realized_pnl);
    println!("Final Equity:     {:.2}", summary.equity);
    println!("Sharpe (rolling): {:.3}", summary.sharpe);
    println!("Max DD (equity):  {:.2}%", summary.max_equity_drawdown * 100.0);
    println!("Max DD (trade):   {:.2}%", summary.max_trade_drawdown * 100.0);
    println!("Open Positions:   {}", summary.open_positions);
    println!("{}", "=".repeat(50));
}
