use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde_json::json;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::NotificationError;
use crate::models::OutboundMessage;

/// Thin client for the transactional-mail HTTP API.
pub struct MailClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MailClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    pub async fn send(&self, from: &str, message: &OutboundMessage) -> Result<(), NotificationError> {
        let url = format!("{}/messages", self.base_url);
        debug!("Sending mail to {} via {}", message.to, url);

        let response = self
            .client
            .post(&url)
            .headers(self.get_headers())
            .json(&json!({
                "from": from,
                "to": message.to,
                "subject": message.subject,
                "text": message.body,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Mail API error ({}): {}", status, error_text);
            return Err(NotificationError::Provider {
                status: status.as_u16(),
                message: error_text,
            });
        }

        debug!("Mail to {} accepted by provider", message.to);
        Ok(())
    }
}
