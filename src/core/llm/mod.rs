//! LLM Client Module
//!
//! Provides the completion-capability boundary used by persona generation:
//!
//! - `router`: `LLMProvider` trait, provider errors and message types
//! - `providers`: concrete provider implementations
//! - `client`: single-exchange `GenerationClient` with cancellation and timeout

pub mod client;
pub mod providers;
pub mod router;

pub use client::{GenerationClient, GenerationError, DEFAULT_TIMEOUT};
pub use providers::*;
pub use router::{
    ChatMessage, ChatRequest, ChatResponse, LLMError, LLMProvider, MessageRole, Result,
    TokenUsage,
};
