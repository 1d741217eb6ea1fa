//! sigscan — equity signal scanner and simulated-position engine.
//!
//! Scans a watch-list of symbols, scores candidates against weighted
//! technical rules, opens simulated positions and manages their exit
//! lifecycle across intraday, BTST (buy-today-sell-tomorrow) and swing
//! strategies.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
