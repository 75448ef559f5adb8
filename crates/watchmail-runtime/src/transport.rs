//! Delivery of notification emails through the Resend HTTP API.

use anyhow::{Result, anyhow};
use serde_json::json;

/// A single outbound notification email.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Opaque delivery mechanism behind the notification engine.
pub trait EmailTransport: Send {
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Sends mail by POSTing to the Resend `/emails` endpoint.
pub struct ResendTransport {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl ResendTransport {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key,
        }
    }
}

impl EmailTransport for ResendTransport {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "to": message.to,
                "from": message.from,
                "subject": message.subject,
                "html": message.html,
                "text": message.text,
            }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("Resend API returned {}: {}", status, body));
        }

        Ok(())
    }
}
