//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod snapshot;
pub mod strategy;
pub mod scorer;
pub mod position;
pub mod lifecycle;
pub mod scheduler;
pub mod engine;
pub mod messages;
pub mod engine_config;
pub mod error;
