use reqwest::Client;
use std::time::Duration;

use crate::api::middleware::error::{ApiError, ApiResult};

/// Relays booking notifications to a Telegram chat. Unconfigured deployments
/// keep the endpoint but answer 501.
#[derive(Clone)]
pub struct TelegramNotifier {
    http_client: Client,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            bot_token,
            chat_id,
        }
    }

    pub async fn send(&self, text: &str) -> ApiResult<()> {
        let (Some(bot_token), Some(chat_id)) = (self.bot_token.as_deref(), self.chat_id.as_deref())
        else {
            return Err(ApiError::NotImplemented(
                "Telegram not configured".to_string(),
            ));
        };

        let url = format!("https://api.telegram.org/bot{}/sendMessage", bot_token);
        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "HTML",
            }))
            .send()
            .await
            .map_err(|e| ApiError::BadGateway(format!("Telegram request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::error!("Telegram API error: {} - {}", status.as_u16(), body);
            return Err(ApiError::BadGateway(format!(
                "Telegram API returned {}",
                status.as_u16()
            )));
        }

        Ok(())
    }
}
