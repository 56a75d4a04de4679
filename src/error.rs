// src/error.rs
use thiserror::Error;

/// Fatal configuration problems. Surfaced from `main` before the engine
/// starts; nothing on the per-tick path returns these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid value for {name}: {value} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ConfigError {
    pub fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Execution failures are a first-class outcome: the orchestrator registers
/// a fill only on success, and logs retryable and terminal failures
/// differently.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("no venue available for {symbol}")]
    NoVenue { symbol: String },

    #[error("order rejected by {venue}: {reason}")]
    Rejected {
        venue: String,
        reason: String,
        retryable: bool,
    },
}

impl ExecutionError {
    /// Whether a later tick may reasonably retry an equivalent order.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExecutionError::NoVenue { .. } => true,
            ExecutionError::Rejected { retryable, .. } => *retryable,
        }
    }
}
