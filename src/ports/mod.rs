//! Port traits: the engine's view of its collaborators.

pub mod config_port;
pub mod data_port;
pub mod journal_port;
pub mod notify_port;
pub mod state_port;
