// src/config.rs

use crate::error::ConfigError;
use config::{Config, File};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Risk parameters for the sizing/portfolio pipeline. Immutable after
/// construction; there is no hot-reload path.
#[derive(Debug, Deserialize, Clone)]
pub struct RiskConfig {
    /// Hard cap on the fraction of equity risked per order.
    pub max_portfolio_risk: f64,
    pub max_leverage: f64,
    /// Equity drawdown fraction that forces a full liquidation.
    pub circuit_breaker: f64,
    pub initial_equity: Decimal,
}

/// Shape of the synthetic market feed.
#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    pub base_price: Decimal,
    /// Per-tick random-walk amplitude as a fraction of price.
    pub volatility: f64,
    pub tick_size: Decimal,
    pub lot_step: Decimal,
    pub tick_interval_ms: u64,
    /// Number of ticks to generate before the session ends.
    pub ticks: u64,
    pub venues: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub symbol: String,
    /// Seeds every random component when set, making a run reproducible.
    pub seed: Option<u64>,
    pub journal_path: String,
    pub summary_path: String,
    pub log_dir: String,
    pub risk: RiskConfig,
    pub feed: FeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("symbol", "BTCUSDT")?
            .set_default("journal_path", "metrics/decision_journal.jsonl")?
            .set_default("summary_path", "metrics/sim_summary.json")?
            .set_default("log_dir", "logs")?
            .set_default("risk.max_portfolio_risk", 0.03)?
            .set_default("risk.max_leverage", 5.0)?
            .set_default("risk.circuit_breaker", 0.10)?
            .set_default("risk.initial_equity", "100000")?
            .set_default("feed.base_price", "50000")?
            .set_default("feed.volatility", 0.004)?
            .set_default("feed.tick_size", "0.01")?
            .set_default("feed.lot_step", "0.00001")?
            .set_default("feed.tick_interval_ms", 250)?
            .set_default("feed.ticks", 200)?
            .set_default("feed.venues", vec!["binance", "kraken", "coinbase"])?
            .add_source(File::with_name("Settings").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Fail-fast check of the risk and feed parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.risk;
        if !(r.max_portfolio_risk > 0.0 && r.max_portfolio_risk <= 1.0) {
            return Err(ConfigError::invalid(
                "risk.max_portfolio_risk",
                r.max_portfolio_risk,
                "must be in (0, 1]",
            ));
        }
        if !(r.max_leverage > 0.0) {
            return Err(ConfigError::invalid(
                "risk.max_leverage",
                r.max_leverage,
                "must be positive",
            ));
        }
        if !(r.circuit_breaker > 0.0 && r.circuit_breaker < 1.0) {
            return Err(ConfigError::invalid(
                "risk.circuit_breaker",
                r.circuit_breaker,
                "must be in (0, 1)",
            ));
        }
        if r.initial_equity <= Decimal::ZERO {
            return Err(ConfigError::invalid(
                "risk.initial_equity",
                r.initial_equity,
                "must be positive",
            ));
        }

        let f = &self.feed;
        if f.base_price <= Decimal::ZERO {
            return Err(ConfigError::invalid(
                "feed.base_price",
                f.base_price,
                "must be positive",
            ));
        }
        if !(f.volatility > 0.0 && f.volatility < 1.0) {
            return Err(ConfigError::invalid(
                "feed.volatility",
                f.volatility,
                "must be in (0, 1)",
            ));
        }
        if f.ticks == 0 {
            return Err(ConfigError::invalid("feed.ticks", f.ticks, "must be positive"));
        }
        if f.venues.is_empty() {
            return Err(ConfigError::invalid(
                "feed.venues",
                "[]",
                "at least one venue is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn valid() -> AppConfig {
        AppConfig {
            symbol: "BTCUSDT".to_string(),
            seed: Some(42),
            journal_path: "metrics/decision_journal.jsonl".to_string(),
            summary_path: "metrics/sim_summary.json".to_string(),
            log_dir: "logs".to_string(),
            risk: RiskConfig {
                max_portfolio_risk: 0.03,
                max_leverage: 5.0,
                circuit_breaker: 0.10,
                initial_equity: Decimal::from_f64(100_000.0).unwrap(),
            },
            feed: FeedConfig {
                base_price: Decimal::from_f64(50_000.0).unwrap(),
                volatility: 0.004,
                tick_size: Decimal::new(1, 2),
                lot_step: Decimal::new(1, 5),
                tick_interval_ms: 250,
                ticks: 200,
                venues: vec!["binance".to_string(), "kraken".to_string()],
            },
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_zero_portfolio_risk() {
        let mut config = valid();
        config.risk.max_portfolio_risk = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_circuit_breaker_at_one() {
        let mut config = valid();
        config.risk.circuit_breaker = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_equity() {
        let mut config = valid();
        config.risk.initial_equity = Decimal::from_f64(-1.0).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_venue_list() {
        let mut config = valid();
        config.feed.venues.clear();
        assert!(config.validate().is_err());
    }
}
