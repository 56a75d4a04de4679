// src/core/engine.rs
use crate::config::AppConfig;
use crate::core::execution::ExecutionRouter;
use crate::core::performance::PerformanceAggregator;
use crate::core::portfolio::PortfolioStateStore;
use crate::core::risk::RiskSizer;
use crate::feeds::traits::SignalProducer;
use crate::storage::Journal;
use crate::types::{
    DecisionSignal, ExecutionReport, MarketSnapshot, PerformanceSnapshot, RiskAdjustedOrder,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// One journal line per tick: the decision, what (if anything) was traded,
/// and the post-mark state.
#[derive(Debug, Serialize)]
struct TickRecord<'a> {
    ts: DateTime<Utc>,
    tick: u64,
    symbol: &'a str,
    decision: &'a DecisionSignal,
    order: Option<&'a RiskAdjustedOrder>,
    report: Option<&'a ExecutionReport>,
    equity: Decimal,
    drawdown: f64,
    breaker_tripped: bool,
    liquidated: usize,
    performance: PerformanceSnapshot,
}

/// End-of-session rollup, printed and persisted by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub symbol: String,
    pub ticks: u64,
    pub equity: Decimal,
    pub realized_pnl: Decimal,
    pub total_trades: u64,
    pub wins: u64,
    pub win_rate: f64,
    pub sharpe: f64,
    /// Equity-curve drawdown from the portfolio store.
    pub max_equity_drawdown: f64,
    /// Worst single-trade loss from the performance aggregator.
    pub max_trade_drawdown: f64,
    pub open_positions: usize,
}

/// Sequences the pipeline once per incoming snapshot:
/// evaluate -> (execute -> register -> update) -> mark-to-market,
/// with the mark unconditional so a same-tick fill is revalued before the
/// next tick can show drift. All portfolio state is owned here; there is
/// exactly one writer.
pub struct Orchestrator<S> {
    symbol: String,
    sizer: RiskSizer,
    router: ExecutionRouter,
    portfolio: PortfolioStateStore,
    performance: PerformanceAggregator,
    signals: S,
    snapshot_rx: mpsc::Receiver<MarketSnapshot>,
    journal: Journal,
    ticks: u64,
}

impl<S> Orchestrator<S>
where
    S: SignalProducer,
{
    pub fn new(
        config: &AppConfig,
        signals: S,
        snapshot_rx: mpsc::Receiver<MarketSnapshot>,
        journal: Journal,
    ) -> Self {
        // One config seed fans out to per-component streams so components
        // stay independent but the whole run is reproducible.
        let (sizer, router) = match config.seed {
            Some(seed) => (
                RiskSizer::with_seed(&config.risk, seed),
                ExecutionRouter::with_seed(seed.wrapping_add(1)),
            ),
            None => (RiskSizer::new(&config.risk), ExecutionRouter::new()),
        };
        Self {
            symbol: config.symbol.clone(),
            sizer,
            router,
            portfolio: PortfolioStateStore::new(
                config.risk.initial_equity,
                config.risk.circuit_breaker,
            ),
            performance: PerformanceAggregator::new(),
            signals,
            snapshot_rx,
            journal,
            ticks: 0,
        }
    }

    /// Drives the session until the feed closes or Ctrl+C arrives.
    pub async fn run(&mut self) -> Result<SessionSummary> {
        info!(symbol = %self.symbol, signals = self.signals.name(), "orchestrator running");
        loop {
            tokio::select! {
                maybe_snapshot = self.snapshot_rx.recv() => {
                    match maybe_snapshot {
                        Some(snapshot) => self.tick(&snapshot).await,
                        None => break,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, ending session");
                    break;
                }
            }
        }
        let summary = self.summary();
        info!(
            ticks = summary.ticks,
            trades = summary.total_trades,
            equity = %summary.equity,
            "session complete"
        );
        Ok(summary)
    }

    async fn tick(&mut self, snapshot: &MarketSnapshot) {
        self.ticks += 1;
        let close = snapshot.ohlcv.close;
        let decision = self.signals.next_signal(snapshot);

        let mut order_out: Option<RiskAdjustedOrder> = None;
        let mut report_out: Option<ExecutionReport> = None;
        let mut performance = self.performance.snapshot();

        if let Some(order) = self
            .sizer
            .evaluate(&decision, snapshot, self.portfolio.equity())
        {
            match self.router.execute(&order, snapshot) {
                Ok(report) => {
                    // A fill is registered only once execution confirms it.
                    self.portfolio
                        .register_fill(&order, report.average_price, report.executed_at);
                    performance = self.performance.update(&report, &order, close);
                    info!(
                        order_id = %order.id,
                        direction = ?order.direction,
                        notional = %order.notional,
                        fill = %report.average_price,
                        "trade executed"
                    );
                    report_out = Some(report);
                }
                Err(error) if error.is_retryable() => {
                    warn!(%error, "execution failed, a later tick may retry");
                }
                Err(error) => {
                    warn!(%error, "execution rejected, dropping order");
                }
            }
            order_out = Some(order);
        }

        // Unconditional: a position opened this tick is marked before any
        // later tick can move it.
        let outcome = self.portfolio.mark_to_market(close);
        if outcome.breaker_tripped {
            for position in &outcome.liquidated {
                performance = self.performance.record_liquidation(position, close);
            }
        }

        let record = TickRecord {
            ts: snapshot.timestamp,
            tick: self.ticks,
            symbol: &self.symbol,
            decision: &decision,
            order: order_out.as_ref(),
            report: report_out.as_ref(),
            equity: outcome.equity,
            drawdown: outcome.drawdown,
            breaker_tripped: outcome.breaker_tripped,
            liquidated: outcome.liquidated.len(),
            performance,
        };
        self.journal.append(&record).await;
    }

    pub fn summary(&self) -> SessionSummary {
        let performance = self.performance.snapshot();
        SessionSummary {
            symbol: self.symbol.clone(),
            ticks: self.ticks,
            equity: self.portfolio.equity(),
            realized_pnl: performance.realized_pnl,
            total_trades: performance.total_trades,
            wins: performance.wins,
            win_rate: performance.win_rate,
            sharpe: performance.sharpe,
            max_equity_drawdown: self.portfolio.max_drawdown(),
            max_trade_drawdown: performance.max_drawdown,
            open_positions: self.portfolio.open_count(),
        }
    }
}
