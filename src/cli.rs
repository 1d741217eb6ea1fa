//! CLI definition and dispatch.

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_journal_adapter::CsvJournalAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_state_adapter::JsonStateAdapter;
use crate::adapters::telegram_adapter::TelegramAdapter;
use crate::domain::engine::{time_label, Engine};
use crate::domain::engine_config::EngineConfig;
use crate::domain::error::SigscanError;
use crate::domain::messages;
use crate::domain::scheduler::exchange_now;
use crate::domain::strategy::StrategyKind;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{Interval, MarketDataPort};
use crate::ports::notify_port::NotifyPort;
use crate::ports::state_port::StateStorePort;

#[derive(Parser, Debug)]
#[command(name = "sigscan", about = "Equity signal scanner and position engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one evaluation pass over the watch-list
    Tick {
        #[arg(short, long)]
        config: PathBuf,
        /// Evaluate as if at this instant (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Send a price snapshot of the watch-list to the notifier
    Snapshot {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Send a pre- or post-market system-status message
    Heartbeat {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, value_enum)]
        phase: HeartbeatPhase,
    },
    /// Send a connectivity-check message
    TestAlert {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum HeartbeatPhase {
    Pre,
    Post,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Tick { config, at } => run_tick(&config, at.as_deref()),
        Command::Snapshot { config } => run_snapshot(&config),
        Command::Heartbeat { config, phase } => run_heartbeat(&config, phase),
        Command::TestAlert { config } => run_test_alert(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SigscanError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

struct Wiring {
    data: CsvDataAdapter,
    store: JsonStateAdapter,
    journal: CsvJournalAdapter,
    notify: TelegramAdapter,
}

fn build_wiring(adapter: &FileConfigAdapter) -> Result<Wiring, SigscanError> {
    let data_dir = adapter
        .get_string("data", "dir")
        .unwrap_or_else(|| "data".to_string());
    let state_dir = adapter
        .get_string("state", "dir")
        .unwrap_or_else(|| "state".to_string());
    let journal_path = adapter
        .get_string("journal", "path")
        .unwrap_or_else(|| "trade_log.csv".to_string());

    let bot_token =
        adapter
            .get_string("telegram", "bot_token")
            .ok_or_else(|| SigscanError::ConfigMissing {
                section: "telegram".into(),
                key: "bot_token".into(),
            })?;
    let chat_id =
        adapter
            .get_string("telegram", "chat_id")
            .ok_or_else(|| SigscanError::ConfigMissing {
                section: "telegram".into(),
                key: "chat_id".into(),
            })?;

    Ok(Wiring {
        data: CsvDataAdapter::new(PathBuf::from(data_dir)),
        store: JsonStateAdapter::new(PathBuf::from(state_dir)),
        journal: CsvJournalAdapter::new(PathBuf::from(journal_path)),
        notify: TelegramAdapter::new(bot_token, chat_id),
    })
}

fn parse_at(at: Option<&str>) -> Result<DateTime<FixedOffset>, SigscanError> {
    match at {
        None => Ok(exchange_now()),
        Some(raw) => {
            DateTime::parse_from_rfc3339(raw).map_err(|e| SigscanError::ConfigInvalid {
                section: "cli".into(),
                key: "at".into(),
                reason: format!("expected RFC 3339, got '{raw}': {e}"),
            })
        }
    }
}

fn run_tick(config_path: &PathBuf, at: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let engine_config = match EngineConfig::from_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let wiring = match build_wiring(&adapter) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let now = match parse_at(at) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Running tick for {} symbols at {}",
        engine_config.watch_list.len(),
        now.to_rfc3339()
    );

    let engine = Engine::new(
        &wiring.data,
        &wiring.store,
        &wiring.journal,
        &wiring.notify,
        engine_config,
    );
    match engine.run_tick(now) {
        Ok(report) => {
            if report.active {
                eprintln!(
                    "Tick complete: {} entered, {} exited, {} skipped, {} dropped",
                    report.entered, report.exited, report.skipped, report.dropped_records
                );
            } else {
                eprintln!("Outside trading session; nothing to do");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_snapshot(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let engine_config = match EngineConfig::from_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let wiring = match build_wiring(&adapter) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut lines = Vec::new();
    for item in engine_config
        .watch_list
        .iter()
        .chain(engine_config.gold_watch_list.iter())
    {
        let price = match wiring.data.fetch_series(&item.instrument, Interval::Daily, 1) {
            Ok(bars) => bars.last().map(|b| b.close),
            Err(e) => {
                eprintln!("warning: no price for {} ({e})", item.name);
                None
            }
        };
        lines.push((item.name.clone(), price));
    }

    let now = exchange_now();
    send_or_report(&wiring.notify, &messages::snapshot_message(&lines, &time_label(now)))
}

fn run_heartbeat(config_path: &PathBuf, phase: HeartbeatPhase) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let wiring = match build_wiring(&adapter) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let swing_open = match wiring.store.load_positions(StrategyKind::Swing) {
        Ok(map) => map.len(),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let now = exchange_now();
    let label = time_label(now);
    let text = match phase {
        HeartbeatPhase::Pre => messages::pre_market_heartbeat(swing_open, &label),
        HeartbeatPhase::Post => {
            let btst_taken = match wiring.store.load_counter(StrategyKind::Btst) {
                Ok(Some(counter)) if counter.date == now.date_naive() => counter.count,
                Ok(_) => 0,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            };
            messages::post_market_heartbeat(swing_open, btst_taken, &label)
        }
    };

    send_or_report(&wiring.notify, &text)
}

fn run_test_alert(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let wiring = match build_wiring(&adapter) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    send_or_report(&wiring.notify, &messages::live_check())
}

/// Unlike tick-time notifications, these commands exist only to deliver a
/// message, so a send failure is their exit status.
fn send_or_report(notify: &dyn NotifyPort, text: &str) -> ExitCode {
    match notify.send(text) {
        Ok(()) => {
            eprintln!("Message sent");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
