// src/core/portfolio.rs
use crate::types::{Position, PositionId, RiskAdjustedOrder};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

/// Result of one mark-to-market pass.
#[derive(Debug, Clone, Serialize)]
pub struct MarkOutcome {
    pub equity: Decimal,
    pub unrealized_pnl: Decimal,
    /// Equity decline this tick as a fraction of prior equity. Negative
    /// when the mark was profitable.
    pub drawdown: f64,
    pub max_drawdown: f64,
    pub breaker_tripped: bool,
    /// Positions force-closed by the circuit breaker, in entry order.
    pub liquidated: Vec<Position>,
}

#[derive(Debug)]
struct Slot {
    id: PositionId,
    position: Position,
}

/// Owns equity, the open-position arena and the equity-curve drawdown
/// history. Single writer: only the orchestrator tick touches it.
///
/// Positions live in a dense vector with stable ids, so entry order is
/// preserved and individual entries can be removed without rebuilding the
/// collection.
pub struct PortfolioStateStore {
    equity: Decimal,
    max_drawdown: f64,
    circuit_breaker: f64,
    next_id: u64,
    positions: Vec<Slot>,
}

impl PortfolioStateStore {
    pub fn new(initial_equity: Decimal, circuit_breaker: f64) -> Self {
        Self {
            equity: initial_equity,
            max_drawdown: 0.0,
            circuit_breaker,
            next_id: 0,
            positions: Vec::new(),
        }
    }

    pub fn equity(&self) -> Decimal {
        self.equity
    }

    /// Worst observed single-tick equity decline.
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    pub fn open_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> impl Iterator<Item = (PositionId, &Position)> {
        self.positions.iter().map(|slot| (slot.id, &slot.position))
    }

    /// Appends a position for a confirmed fill. Each fill becomes its own
    /// position; same-direction entries are never merged. The fill price
    /// must be positive (guaranteed by the router on the success path).
    pub fn register_fill(
        &mut self,
        order: &RiskAdjustedOrder,
        fill_price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> PositionId {
        let id = PositionId(self.next_id);
        self.next_id += 1;
        self.positions.push(Slot {
            id,
            position: Position {
                direction: order.direction,
                entry_price: fill_price,
                size: order.notional / fill_price,
                leverage: order.leverage,
                stop_loss: order.stop_loss,
                take_profit: order.take_profit,
                hold_minutes: order.hold_minutes,
                opened_at: timestamp,
            },
        });
        id
    }

    /// Removes a single position by id. Exit path for a future
    /// stop/target/age monitor; the circuit breaker does not use it.
    pub fn remove(&mut self, id: PositionId) -> Option<Position> {
        let index = self.positions.iter().position(|slot| slot.id == id)?;
        Some(self.positions.remove(index).position)
    }

    /// Revalues every open position against `price`, folds the unrealized
    /// sum into equity and ratchets the drawdown high-water mark. When the
    /// tick's drawdown exceeds the circuit breaker the whole arena is
    /// drained, not filtered, and the removed positions are handed back so
    /// the caller can realize them.
    pub fn mark_to_market(&mut self, price: Decimal) -> MarkOutcome {
        let prior = self.equity;
        let unrealized: Decimal = self
            .positions
            .iter()
            .map(|slot| slot.position.unrealized_pnl(price))
            .sum();
        self.equity = prior + unrealized;

        let drawdown = if prior > Decimal::ZERO {
            ((prior - self.equity) / prior).to_f64().unwrap_or(0.0)
        } else {
            0.0
        };
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }

        let breaker_tripped = drawdown > self.circuit_breaker;
        let liquidated = if breaker_tripped {
            warn!(
                drawdown,
                threshold = self.circuit_breaker,
                open_positions = self.positions.len(),
                "circuit breaker tripped, force-liquidating"
            );
            self.positions.drain(..).map(|slot| slot.position).collect()
        } else {
            Vec::new()
        };

        MarkOutcome {
            equity: self.equity,
            unrealized_pnl: unrealized,
            drawdown,
            max_drawdown: self.max_drawdown,
            breaker_tripped,
            liquidated,
        }
    }
}
