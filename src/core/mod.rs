pub mod engine;
pub mod execution;
pub mod performance;
pub mod portfolio;
pub mod risk;
