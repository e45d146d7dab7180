//! LLM Provider Seam
//!
//! Defines the unified `LLMProvider` trait that every completion backend
//! implements, together with the provider-level error type.

pub mod types;

pub use types::{ChatMessage, ChatRequest, ChatResponse, MessageRole, TokenUsage};

use async_trait::async_trait;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

// ============================================================================
// LLM Provider Trait
// ============================================================================

/// Trait that all completion providers must implement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Get the provider's unique identifier
    fn id(&self) -> &str;

    /// Get the provider's display name
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Send a chat completion request
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}
