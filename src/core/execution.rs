// src/core/execution.rs
use crate::error::ExecutionError;
use crate::types::{Direction, ExchangeFeed, ExecutionFill, ExecutionReport, MarketSnapshot, RiskAdjustedOrder};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tracing::debug;

const BASE_LATENCY_MS: f64 = 50.0;
const LATENCY_JITTER_MS: f64 = 100.0;

/// Turns an accepted order into a simulated fill: picks the best venue for
/// the direction, applies spread-scaled price noise against the taker and
/// reports slippage versus the consolidated close.
pub struct ExecutionRouter {
    rng: StdRng,
}

impl ExecutionRouter {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Longs buy from the cheapest feed, shorts sell to the dearest.
    pub fn choose_venue<'a>(
        &self,
        direction: Direction,
        feeds: &'a [ExchangeFeed],
    ) -> Option<&'a ExchangeFeed> {
        match direction {
            Direction::Long => feeds.iter().min_by_key(|feed| feed.price),
            Direction::Short => feeds.iter().max_by_key(|feed| feed.price),
        }
    }

    pub fn execute(
        &mut self,
        order: &RiskAdjustedOrder,
        snapshot: &MarketSnapshot,
    ) -> Result<ExecutionReport, ExecutionError> {
        let venue = self
            .choose_venue(order.direction, &snapshot.feeds)
            .ok_or_else(|| ExecutionError::NoVenue {
                symbol: snapshot.symbol.clone(),
            })?
            .clone();

        let mid = snapshot.ohlcv.close;
        let noise_fraction = self.rng.random::<f64>() * venue.spread;
        let price_noise = mid * Decimal::from_f64(noise_fraction).unwrap_or_default();
        // Noise always moves against the taker.
        let fill_price = match order.direction {
            Direction::Long => venue.price + price_noise,
            Direction::Short => venue.price - price_noise,
        };
        if fill_price <= Decimal::ZERO {
            return Err(ExecutionError::Rejected {
                venue: venue.exchange,
                reason: "non-positive fill price".to_string(),
                retryable: false,
            });
        }

        let size = order.notional / fill_price;
        let slippage = if mid > Decimal::ZERO {
            ((fill_price - mid) / mid).to_f64().unwrap_or(0.0)
        } else {
            0.0
        };
        let latency_ms = BASE_LATENCY_MS + self.rng.random::<f64>() * LATENCY_JITTER_MS;

        debug!(
            order_id = %order.id,
            venue = %venue.exchange,
            %fill_price,
            slippage,
            "order filled"
        );

        Ok(ExecutionReport {
            order_id: order.id,
            fills: vec![ExecutionFill {
                exchange: venue.exchange,
                price: fill_price,
                size,
                latency_ms,
            }],
            average_price: fill_price,
            slippage,
            executed_at: Utc::now(),
        })
    }
}

impl Default for ExecutionRouter {
    fn default() -> Self {
        Self::new()
    }
}
