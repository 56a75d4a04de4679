// src/feeds/synthetic.rs
use crate::config::FeedConfig;
use crate::feeds::traits::SnapshotProducer;
use crate::types::{ExchangeFeed, MarketSnapshot, Ohlcv};
use crate::utils::precision::{quantize_price, quantize_quantity};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Random-walk snapshot generator. Emits a configured number of ticks at a
/// fixed interval, each with a consolidated candle plus one quote per
/// simulated venue, then drops the sender to end the session.
pub struct SyntheticFeed {
    symbol: String,
    config: FeedConfig,
    seed: Option<u64>,
}

impl SyntheticFeed {
    pub fn new(symbol: String, config: FeedConfig, seed: Option<u64>) -> Self {
        Self { symbol, config, seed }
    }

    fn build_snapshot(
        symbol: &str,
        config: &FeedConfig,
        rng: &mut StdRng,
        venue_spreads: &[(String, f64)],
        last_close: f64,
    ) -> (MarketSnapshot, f64) {
        let vol = config.volatility;
        let open = last_close;
        let drift = rng.random_range(-1.0..1.0) * vol;
        let close = (open * (1.0 + drift)).max(0.01);
        let wick_up = rng.random::<f64>() * vol * 0.5;
        let wick_down = rng.random::<f64>() * vol * 0.5;
        let high = open.max(close) * (1.0 + wick_up);
        let low = (open.min(close) * (1.0 - wick_down)).max(0.01);
        let volume = rng.random_range(100.0..5_000.0);

        let tick = config.tick_size;
        let candle = Ohlcv {
            open: quantize_price(decimal(open), tick),
            high: quantize_price(decimal(high), tick),
            low: quantize_price(decimal(low), tick),
            close: quantize_price(decimal(close), tick),
            volume: quantize_quantity(decimal(volume), config.lot_step),
        };

        let feeds = venue_spreads
            .iter()
            .map(|(exchange, spread)| {
                let skew = rng.random_range(-1.0..1.0) * spread;
                ExchangeFeed {
                    exchange: exchange.clone(),
                    price: quantize_price(decimal(close * (1.0 + skew)), tick),
                    spread: *spread,
                    volume_24h: decimal(rng.random_range(1.0e6..5.0e7)),
                    funding_rate: rng.random_range(-0.0005..0.0005),
                }
            })
            .collect();

        let snapshot = MarketSnapshot {
            symbol: symbol.to_string(),
            ohlcv: candle,
            feeds,
            timestamp: Utc::now(),
        };
        (snapshot, close)
    }
}

fn decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[async_trait]
impl SnapshotProducer for SyntheticFeed {
    async fn subscribe(&mut self, sender: mpsc::Sender<MarketSnapshot>) -> Result<()> {
        let symbol = self.symbol.clone();
        let config = self.config.clone();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(symbol = %symbol, ticks = config.ticks, "starting synthetic feed");

        tokio::spawn(async move {
            // Per-venue spreads are fixed for the whole session.
            let venue_spreads: Vec<(String, f64)> = config
                .venues
                .iter()
                .map(|venue| (venue.clone(), rng.random_range(0.0002..0.002)))
                .collect();

            let mut last_close = config.base_price.to_f64().unwrap_or(50_000.0);
            let mut interval =
                tokio::time::interval(Duration::from_millis(config.tick_interval_ms.max(1)));

            for _ in 0..config.ticks {
                interval.tick().await;
                let (snapshot, close) = SyntheticFeed::build_snapshot(
                    &symbol,
                    &config,
                    &mut rng,
                    &venue_spreads,
                    last_close,
                );
                last_close = close;
                if sender.send(snapshot).await.is_err() {
                    // Receiver gone; the session is over.
                    break;
                }
            }
            info!(symbol = %symbol, "synthetic feed finished");
        });

        Ok(())
    }
}
