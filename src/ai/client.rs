use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::{Error, Result};
use reqwest::Client;
use std::time::Duration;

pub const CHAT_COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";

/// Bearer-authenticated client for an OpenAI-compatible chat-completion API.
pub struct ChatCompletionsHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ChatCompletionsHttpClient {
    pub fn new_with_client(
        api_key: String,
        base_url: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Single attempt. Transport failures and timeouts surface as
    /// `UpstreamTransport`, non-2xx as `UpstreamStatus`.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send chat completion request: {}", e);
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Chat completion API error (status {}): {}", status, body);
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse chat completion envelope: {}\nBody: {}", e, body);
            Error::MalformedResponse(format!("Unexpected chat completion envelope: {}", e))
        })
    }
}
