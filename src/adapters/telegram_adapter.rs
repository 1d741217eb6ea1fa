//! Telegram Bot API notification adapter.
//!
//! Posts plain-text messages to a single chat via `sendMessage`. The engine
//! treats delivery as fire-and-forget; this adapter only reports the failure.

use crate::domain::error::SigscanError;
use crate::ports::notify_port::NotifyPort;
use reqwest::blocking::Client;
use std::time::Duration;

pub struct TelegramAdapter {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramAdapter {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self::with_api_base("https://api.telegram.org".to_string(), bot_token, chat_id)
    }

    /// Point at a different API host; tests use this against a local server.
    pub fn with_api_base(api_base: String, bot_token: String, chat_id: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_base,
            bot_token,
            chat_id,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

impl NotifyPort for TelegramAdapter {
    fn send(&self, text: &str) -> Result<(), SigscanError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .map_err(|e| SigscanError::Notification {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SigscanError::Notification {
                reason: format!("telegram returned {}", response.status()),
            });
        }
        Ok(())
    }
}
