// src/core/performance.rs
use crate::types::{ExecutionReport, PerformanceSnapshot, Position, RiskAdjustedOrder};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Capacity of the rolling per-trade return window.
pub const RETURN_WINDOW: usize = 100;

/// Annualization constant for the rolling Sharpe ratio. A fixed design
/// choice assuming roughly daily sampling; revisit if the driving tick
/// cadence changes.
const ANNUALIZATION_DAYS: f64 = 365.0;

/// Rolling realized PnL, win count, Sharpe and per-trade drawdown.
///
/// The drawdown here is the worst single-trade loss, a deliberately weaker
/// metric than the equity-curve drawdown owned by the portfolio store; the
/// two are reported side by side.
pub struct PerformanceAggregator {
    realized_pnl: Decimal,
    total_trades: u64,
    wins: u64,
    max_drawdown: f64,
    returns: VecDeque<f64>,
}

impl PerformanceAggregator {
    pub fn new() -> Self {
        Self {
            realized_pnl: Decimal::ZERO,
            total_trades: 0,
            wins: 0,
            max_drawdown: 0.0,
            returns: VecDeque::with_capacity(RETURN_WINDOW),
        }
    }

    /// Records a routed fill marked against `mark_price`.
    pub fn update(
        &mut self,
        report: &ExecutionReport,
        order: &RiskAdjustedOrder,
        mark_price: Decimal,
    ) -> PerformanceSnapshot {
        let entry = report.average_price;
        let raw_return = if entry > Decimal::ZERO {
            ((mark_price - entry) / entry).to_f64().unwrap_or(0.0)
        } else {
            0.0
        };
        let position_return = raw_return * order.direction.sign();
        let pnl = Decimal::from_f64(position_return).unwrap_or_default() * order.notional;
        self.record(position_return, pnl)
    }

    /// Realizes a circuit-breaker liquidation as a synthetic close at the
    /// breaching mark price, through the same recording path as a routed
    /// fill.
    pub fn record_liquidation(
        &mut self,
        position: &Position,
        mark_price: Decimal,
    ) -> PerformanceSnapshot {
        let entry = position.entry_price;
        let raw_return = if entry > Decimal::ZERO {
            ((mark_price - entry) / entry).to_f64().unwrap_or(0.0)
        } else {
            0.0
        };
        let position_return = raw_return * position.direction.sign();
        let notional = position.entry_price * position.size;
        let pnl = Decimal::from_f64(position_return).unwrap_or_default() * notional;
        self.record(position_return, pnl)
    }

    fn record(&mut self, position_return: f64, pnl: Decimal) -> PerformanceSnapshot {
        self.realized_pnl += pnl;
        self.total_trades += 1;
        if pnl > Decimal::ZERO {
            self.wins += 1;
        }

        if self.returns.len() == RETURN_WINDOW {
            self.returns.pop_front();
        }
        self.returns.push_back(position_return);

        let trade_drawdown = (-position_return).max(0.0);
        if trade_drawdown > self.max_drawdown {
            self.max_drawdown = trade_drawdown;
        }

        self.snapshot()
    }

    pub fn snapshot(&self) -> PerformanceSnapshot {
        let n = self.returns.len();
        let (mean, std_dev) = if n == 0 {
            (0.0, 0.0)
        } else {
            let mean = self.returns.iter().sum::<f64>() / n as f64;
            let variance = self
                .returns
                .iter()
                .map(|r| (r - mean) * (r - mean))
                .sum::<f64>()
                / n as f64;
            (mean, variance.sqrt())
        };
        let sharpe = if std_dev == 0.0 {
            0.0
        } else {
            mean * ANNUALIZATION_DAYS.sqrt() / std_dev
        };
        let win_rate = if self.total_trades == 0 {
            0.0
        } else {
            self.wins as f64 / self.total_trades as f64
        };

        PerformanceSnapshot {
            realized_pnl: self.realized_pnl,
            total_trades: self.total_trades,
            wins: self.wins,
            win_rate,
            sharpe,
            max_drawdown: self.max_drawdown,
        }
    }
}

impl Default for PerformanceAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use chrono::Utc;
    use uuid::Uuid;

    fn order(direction: Direction, notional: i64) -> RiskAdjustedOrder {
        RiskAdjustedOrder {
            id: Uuid::new_v4(),
            symbol: "BTCUSDT".to_string(),
            direction,
            notional: Decimal::from(notional),
            leverage: 2.0,
            stop_loss: Decimal::from(48_000),
            take_profit: Decimal::from(53_000),
            hold_minutes: 90,
        }
    }

    fn report(order: &RiskAdjustedOrder, fill: i64) -> ExecutionReport {
        let price = Decimal::from(fill);
        ExecutionReport {
            order_id: order.id,
            fills: vec![],
            average_price: price,
            slippage: 0.0,
            executed_at: Utc::now(),
        }
    }

    #[test]
    fn single_sample_sharpe_is_zero() {
        let mut perf = PerformanceAggregator::new();
        let ord = order(Direction::Long, 10_000);
        let snap = perf.update(&report(&ord, 50_000), &ord, Decimal::from(50_500));
        assert_eq!(snap.total_trades, 1);
        assert_eq!(snap.sharpe, 0.0);
    }

    #[test]
    fn winning_long_counts_a_win() {
        let mut perf = PerformanceAggregator::new();
        let ord = order(Direction::Long, 10_000);
        // +1% move on 10000 notional.
        let snap = perf.update(&report(&ord, 50_000), &ord, Decimal::from(50_500));
        assert_eq!(snap.wins, 1);
        assert!((snap.realized_pnl.to_f64().unwrap() - 100.0).abs() < 1e-6);
        assert_eq!(snap.max_drawdown, 0.0);
    }

    #[test]
    fn losing_short_sets_trade_drawdown() {
        let mut perf = PerformanceAggregator::new();
        let ord = order(Direction::Short, 10_000);
        // Price rallies 1% against the short.
        let snap = perf.update(&report(&ord, 50_000), &ord, Decimal::from(50_500));
        assert_eq!(snap.wins, 0);
        assert!(snap.realized_pnl < Decimal::ZERO);
        assert!((snap.max_drawdown - 0.01).abs() < 1e-9);
    }

    #[test]
    fn window_is_bounded_at_capacity() {
        let mut perf = PerformanceAggregator::new();
        let ord = order(Direction::Long, 1_000);
        for i in 0..(RETURN_WINDOW + 50) {
            let mark = Decimal::from(50_000 + (i as i64 % 7) * 10);
            perf.update(&report(&ord, 50_000), &ord, mark);
        }
        assert_eq!(perf.returns.len(), RETURN_WINDOW);
        assert_eq!(perf.total_trades, (RETURN_WINDOW + 50) as u64);
    }

    #[test]
    fn sharpe_is_nonzero_once_returns_disperse() {
        let mut perf = PerformanceAggregator::new();
        let ord = order(Direction::Long, 10_000);
        perf.update(&report(&ord, 50_000), &ord, Decimal::from(50_500));
        let snap = perf.update(&report(&ord, 50_000), &ord, Decimal::from(49_750));
        assert!(snap.sharpe != 0.0);
        assert!((snap.win_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn liquidation_routes_through_normal_recording() {
        let mut perf = PerformanceAggregator::new();
        let position = Position {
            direction: Direction::Long,
            entry_price: Decimal::from(50_000),
            size: Decimal::from(2),
            leverage: 2.0,
            stop_loss: Decimal::from(48_000),
            take_profit: Decimal::from(53_000),
            hold_minutes: 90,
            opened_at: Utc::now(),
        };
        // Forced close 4% under entry: loss of 4% on 100000 notional.
        let snap = perf.record_liquidation(&position, Decimal::from(48_000));
        assert_eq!(snap.total_trades, 1);
        assert_eq!(snap.wins, 0);
        assert!((snap.realized_pnl.to_f64().unwrap() + 4_000.0).abs() < 1e-6);
        assert!((snap.max_drawdown - 0.04).abs() < 1e-9);
    }
}
