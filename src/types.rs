// src/types.rs
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1.0 for long exposure, -1.0 for short. Used when folding a price
    /// move into a signed position return.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

/// One consolidated candle for the current tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ohlcv {
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// A single simulated venue quote inside a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeFeed {
    pub exchange: String,
    pub price: Decimal,
    /// Quoted spread as a fraction of price.
    pub spread: f64,
    pub volume_24h: Decimal,
    pub funding_rate: f64,
}

/// Market state delivered once per tick by the feed producer. The core
/// never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub ohlcv: Ohlcv,
    pub feeds: Vec<ExchangeFeed>,
    pub timestamp: DateTime<Utc>,
}

/// Output of the signal layer. `confidence` and `position_size` are in
/// [0,1], `sentiment_score` in [-1,1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecisionSignal {
    pub action: SignalAction,
    pub confidence: f64,
    pub position_size: f64,
    pub sentiment_score: f64,
}

/// A sized order produced by the risk sizer. Immutable after creation and
/// consumed exactly once by the execution router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAdjustedOrder {
    pub id: Uuid,
    pub symbol: String,
    pub direction: Direction,
    pub notional: Decimal,
    pub leverage: f64,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub hold_minutes: u32,
}

/// Stable handle into the portfolio position arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionId(pub u64);

/// An open position. Created by `register_fill` and owned exclusively by
/// the portfolio store. Stop/target/hold fields are recorded but not
/// enforced by any monitor; see DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub direction: Direction,
    pub entry_price: Decimal,
    pub size: Decimal,
    pub leverage: f64,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub hold_minutes: u32,
    pub opened_at: DateTime<Utc>,
}

impl Position {
    /// Unrealized PnL of this position against the given mark price.
    pub fn unrealized_pnl(&self, price: Decimal) -> Decimal {
        match self.direction {
            Direction::Long => (price - self.entry_price) * self.size,
            Direction::Short => (self.entry_price - price) * self.size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionFill {
    pub exchange: String,
    pub price: Decimal,
    pub size: Decimal,
    pub latency_ms: f64,
}

/// Result of routing one order. Produced once per order, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub order_id: Uuid,
    pub fills: Vec<ExecutionFill>,
    pub average_price: Decimal,
    /// (fill - mid) / mid, signed.
    pub slippage: f64,
    pub executed_at: DateTime<Utc>,
}

/// Rolling performance view, recomputed after every recorded trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub realized_pnl: Decimal,
    pub total_trades: u64,
    pub wins: u64,
    pub win_rate: f64,
    pub sharpe: f64,
    /// Worst single-trade loss as a positive fraction. Distinct from the
    /// equity-curve drawdown tracked by the portfolio store.
    pub max_drawdown: f64,
}
