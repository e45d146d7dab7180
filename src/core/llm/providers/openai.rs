//! OpenAI Provider Implementation
//!
//! Also usable against any OpenAI-compatible `/chat/completions` endpoint by
//! overriding the base URL.

use crate::core::llm::router::{
    ChatRequest, ChatResponse, LLMError, LLMProvider, MessageRole, Result, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::OnceCell;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI provider
///
/// The underlying HTTP client is built lazily on first use and reused for
/// every later request. Concurrent first calls race on a `OnceCell`, so the
/// client is constructed exactly once.
pub struct OpenAIProvider {
    api_key: String,
    model: String,
    max_tokens: u32,
    organization_id: Option<String>,
    base_url: String,
    client: OnceCell<Client>,
}

impl OpenAIProvider {
    pub fn new(
        api_key: String,
        model: String,
        max_tokens: u32,
        organization_id: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        let base_url = base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            api_key,
            model,
            max_tokens,
            organization_id,
            base_url,
            client: OnceCell::new(),
        }
    }

    pub fn gpt4o(api_key: String) -> Self {
        Self::new(api_key, "gpt-4o".to_string(), 4096, None, None)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the HTTP client has been built yet.
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    async fn http_client(&self) -> Result<&Client> {
        self.client
            .get_or_try_init(|| async {
                log::debug!("Building HTTP client for {}", self.base_url);
                Client::builder()
                    .connect_timeout(CONNECT_TIMEOUT)
                    .build()
                    .map_err(LLMError::from)
            })
            .await
    }

    fn build_messages(&self, request: &ChatRequest) -> Vec<serde_json::Value> {
        request
            .messages
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": match msg.role {
                        MessageRole::System => "system",
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                    },
                    "content": msg.content
                })
            })
            .collect()
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        if self.api_key.is_empty() {
            return Err(LLMError::NotConfigured("OpenAI API key is empty".to_string()));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let messages = self.build_messages(&request);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.max_tokens.unwrap_or(self.max_tokens)
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        let start = std::time::Instant::now();
        let mut req_builder = self
            .http_client()
            .await?
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");

        if let Some(org_id) = &self.organization_id {
            req_builder = req_builder.header("OpenAI-Organization", org_id);
        }

        let resp = req_builder.json(&body).send().await?;
        let status = resp.status();
        let latency = start.elapsed().as_millis() as u64;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(LLMError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LLMError::AuthError("Invalid API key".to_string()));
        }

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LLMError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let json: serde_json::Value = resp.json().await?;

        let first_choice = json["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .ok_or_else(|| LLMError::InvalidResponse("No choices returned".to_string()))?;

        let content = first_choice["message"]["content"]
            .as_str()
            .ok_or_else(|| LLMError::InvalidResponse("Missing content".to_string()))?
            .to_string();

        let usage = json["usage"].as_object().map(|u| TokenUsage {
            input_tokens: u["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            output_tokens: u["completion_tokens"].as_u64().unwrap_or(0) as u32,
        });

        let finish_reason = first_choice["finish_reason"].as_str().map(|s| s.to_string());

        Ok(ChatResponse {
            content,
            model: json["model"].as_str().unwrap_or(&self.model).to_string(),
            provider: "openai".to_string(),
            usage,
            finish_reason,
            latency_ms: latency,
        })
    }
}
