//! LLM Provider Implementations
//!
//! Concrete implementations of the `LLMProvider` trait plus the
//! configuration enum used to construct them.
//!
//! Adding a new provider requires:
//! 1. A new enum variant in `ProviderConfig`
//! 2. The provider implementation file

mod openai;

pub use openai::{OpenAIProvider, DEFAULT_BASE_URL};

use super::router::LLMProvider;
use std::sync::Arc;

/// Configuration for creating providers
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        model: String,
        max_tokens: u32,
        organization_id: Option<String>,
        base_url: Option<String>,
    },
}

impl ProviderConfig {
    /// Create a provider from this configuration.
    ///
    /// The returned handle is meant to be built once per process and shared.
    pub fn create_provider(&self) -> Arc<dyn LLMProvider> {
        match self {
            ProviderConfig::OpenAI {
                api_key,
                model,
                max_tokens,
                organization_id,
                base_url,
            } => Arc::new(OpenAIProvider::new(
                api_key.clone(),
                model.clone(),
                *max_tokens,
                organization_id.clone(),
                base_url.clone(),
            )),
        }
    }

    /// Get the provider ID for this configuration
    pub fn provider_id(&self) -> &'static str {
        match self {
            ProviderConfig::OpenAI { .. } => "openai",
        }
    }

    /// Get the model name for this configuration
    pub fn model_name(&self) -> String {
        match self {
            ProviderConfig::OpenAI { model, .. } => model.clone(),
        }
    }
}
