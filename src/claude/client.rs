use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, warn};

use crate::claude::{get_api_key, resolve_model_alias, ErrorResponse, MessagesRequest, MessagesResponse};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Claude Messages API client
pub struct ClaudeClient {
    client: HttpClient,
    api_key: String,
}

impl ClaudeClient {
    /// Create a client from `ANTHROPIC_API_KEY`
    pub fn new() -> Result<Self> {
        let api_key = get_api_key()?;

        if api_key.trim().is_empty() {
            return Err(anyhow!("ANTHROPIC_API_KEY is empty"));
        }

        if !api_key.starts_with("sk-") {
            warn!("ANTHROPIC_API_KEY doesn't start with 'sk-' - this may not be a valid Anthropic API key");
        }

        let client = HttpClient::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(ClaudeClient { client, api_key })
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key).context("Invalid API key format")?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// Send a messages request; a failed call is reported, not retried
    pub fn messages(&self, mut request: MessagesRequest) -> Result<MessagesResponse> {
        request.model = resolve_model_alias(&request.model);
        debug!("Sending {} to Claude API", request.model);

        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&request)
            .send()
            .context("Failed to send request to Claude API")?;

        handle_response(response)
    }
}

fn handle_response(response: Response) -> Result<MessagesResponse> {
    let status = response.status();
    let body = response.text().context("Failed to read response body")?;

    if status.is_success() {
        return serde_json::from_str(&body).context("Failed to parse successful response");
    }

    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error_response) => Err(anyhow!(
            "Claude API error ({}): {}",
            error_response.error.error_type,
            error_response.error.message
        )),
        Err(_) => Err(anyhow!("Claude API error ({}): {}", status, body)),
    }
}
