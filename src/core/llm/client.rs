//! Generation Client
//!
//! Wraps a single completion call against an `LLMProvider`: one user-role
//! message in, raw text out. Owns cancellation and timeout handling so the
//! rest of the pipeline never blocks indefinitely on the network.

use super::router::{ChatRequest, LLMError, LLMProvider};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Upper bound applied to every completion call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum GenerationError {
    /// The capability could not be reached, rejected the request, or
    /// answered without any completion choice.
    #[error("Completion capability unavailable: {0}")]
    Unavailable(String),

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Generation timed out after {millis}ms")]
    TimedOut { millis: u64 },
}

impl GenerationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<LLMError> for GenerationError {
    fn from(err: LLMError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

// ============================================================================
// Generation Client
// ============================================================================

/// Single-exchange completion client.
///
/// Cheap to clone; clones share the same provider handle.
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn LLMProvider>,
    timeout: Duration,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_TIMEOUT,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        let mut request = ChatRequest::single(prompt);
        if let Some(max) = self.max_tokens {
            request = request.with_max_tokens(max);
        }
        if let Some(temp) = self.temperature {
            request = request.with_temperature(temp);
        }
        request
    }

    /// Send `prompt` and return the raw completion text.
    ///
    /// The call is always bounded by the configured timeout. When a
    /// cancellation token is supplied and fires first, the in-flight request
    /// is dropped and `GenerationError::Cancelled` is returned.
    pub async fn complete(
        &self,
        prompt: &str,
        cancellation: Option<&CancellationToken>,
    ) -> Result<String, GenerationError> {
        let request = self.build_request(prompt);
        let bounded = tokio::time::timeout(self.timeout, self.provider.chat(request));

        let outcome = match cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        log::info!("Completion request cancelled by caller");
                        return Err(GenerationError::Cancelled);
                    }
                    outcome = bounded => outcome,
                }
            }
            None => bounded.await,
        };

        match outcome {
            Err(_) => {
                log::warn!("Completion request timed out after {:?}", self.timeout);
                Err(GenerationError::TimedOut {
                    millis: self.timeout.as_millis() as u64,
                })
            }
            Ok(Err(e)) => {
                log::warn!("Completion request failed: {}", e);
                Err(e.into())
            }
            Ok(Ok(response)) => {
                log::debug!(
                    "Completion received from {} ({} ms, {} tokens)",
                    response.model,
                    response.latency_ms,
                    response.usage.as_ref().map(|u| u.total()).unwrap_or(0)
                );
                Ok(response.content)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
