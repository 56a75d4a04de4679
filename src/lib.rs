pub mod config;
pub mod core;
pub mod error;
pub mod feeds;
pub mod storage;
pub mod types;
pub mod utils;
