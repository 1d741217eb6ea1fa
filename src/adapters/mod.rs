//! Concrete implementations of the outbound ports.

pub mod csv_data_adapter;
pub mod csv_journal_adapter;
pub mod file_config_adapter;
pub mod json_state_adapter;
pub mod telegram_adapter;
