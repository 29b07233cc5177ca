use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client as HttpClient;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Body posted to the webhook
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub message: &'a str,
}

/// Posts the rendered report to a chat webhook
pub struct Notifier {
    http: HttpClient,
    webhook_url: String,
}

impl Notifier {
    pub fn new(webhook_url: &str) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Notifier {
            http,
            webhook_url: webhook_url.to_string(),
        })
    }

    pub fn post(&self, message: &str) -> Result<()> {
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&WebhookPayload { message })
            .send()
            .context("Failed to reach webhook")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("Webhook returned {}: {}", status, body));
        }

        info!("Report posted to webhook: {}", status);
        Ok(())
    }

    /// Post the report, logging instead of failing
    pub fn post_report(&self, message: &str) -> bool {
        match self.post(message) {
            Ok(()) => true,
            Err(e) => {
                warn!("Error posting report to webhook: {:#}", e);
                false
            }
        }
    }
}
