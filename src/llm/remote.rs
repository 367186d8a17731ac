//! Remote chat-completion client.
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint. Any
//! failure here is fatal for the run.

use crate::config::Config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Chat-completion API request.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completion API response.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_first_content(self) -> Result<String> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .context("Chat completion returned no choices")?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

/// Client for the hosted model.
pub struct RemoteClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl RemoteClient {
    pub fn new(config: &Config, api_key: String) -> Result<Self> {
        info!("Initializing remote client for model {}", config.model);

        let http_client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            endpoint: format!(
                "{}/chat/completions",
                config.api_base_url.trim_end_matches('/')
            ),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Send the prompt as a single user message and return the first completion.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!("POST {} ({} prompt bytes)", self.endpoint, prompt.len());

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let context = if e.is_connect() {
                    format!("Cannot connect to {}", self.endpoint)
                } else {
                    format!("Failed to send request to {}", self.endpoint)
                };
                anyhow::Error::new(e).context(context)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Chat completion API error {}: {}", status, body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        let content = completion.into_first_content()?;
        info!("Received {} bytes from {}", content.len(), self.model);
        Ok(content)
    }
}
