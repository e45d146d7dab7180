//! OpenAI Provider Unit Tests
//!
//! Tests for the OpenAI provider implementation including:
//! - API request formatting
//! - Response parsing
//! - Error handling (rate limits, auth errors, API errors)
//! - Organization ID and custom base URL support

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::llm::providers::{OpenAIProvider, DEFAULT_BASE_URL};
use crate::core::llm::router::{ChatRequest, LLMError, LLMProvider};

fn provider_for(server: &MockServer, org: Option<&str>) -> OpenAIProvider {
    OpenAIProvider::new(
        "sk-test-key".to_string(),
        "gpt-4o".to_string(),
        4096,
        org.map(str::to_string),
        Some(format!("{}/v1/", server.uri())),
    )
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 45}
    })
}

// =============================================================================
// Provider Identity Tests
// =============================================================================

#[test]
fn test_provider_identity() {
    let provider = OpenAIProvider::gpt4o("sk-test-key".to_string());
    assert_eq!(provider.id(), "openai");
    assert_eq!(provider.name(), "OpenAI");
    assert_eq!(provider.model(), "gpt-4o");
    assert_eq!(provider.base_url(), DEFAULT_BASE_URL);
}

#[test]
fn test_trailing_slash_trimmed() {
    let provider = OpenAIProvider::new(
        "sk-test-key".to_string(),
        "gpt-4o".to_string(),
        4096,
        None,
        Some("https://custom-api.example.com/v1/".to_string()),
    );
    assert_eq!(provider.base_url(), "https://custom-api.example.com/v1");
}

// =============================================================================
// Request / Response Tests
// =============================================================================

#[tokio::test]
async fn test_chat_sends_single_user_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "Describe a persona"}],
            "max_tokens": 512
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, None);
    assert!(!provider.is_initialized());

    let response = provider
        .chat(ChatRequest::single("Describe a persona").with_max_tokens(512))
        .await
        .unwrap();

    assert_eq!(response.content, "{}");
    assert_eq!(response.model, "gpt-4o-2024-08-06");
    assert_eq!(response.provider, "openai");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    let usage = response.usage.unwrap();
    assert_eq!(usage.input_tokens, 120);
    assert_eq!(usage.total(), 165);
    assert!(provider.is_initialized());
}

#[tokio::test]
async fn test_http_client_reused_across_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(3)
        .mount(&server)
        .await;

    let provider = std::sync::Arc::new(provider_for(&server, None));
    let calls = (0..3).map(|_| {
        let provider = provider.clone();
        tokio::spawn(async move { provider.chat(ChatRequest::single("hi")).await })
    });
    for call in calls {
        assert_eq!(call.await.unwrap().unwrap().content, "ok");
    }
}

#[tokio::test]
async fn test_organization_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("OpenAI-Organization", "org-12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Some("org-12345"));
    provider.chat(ChatRequest::single("hi")).await.unwrap();
}

#[tokio::test]
async fn test_temperature_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"temperature": 0.5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    provider_for(&server, None)
        .chat(ChatRequest::single("hi").with_temperature(0.5))
        .await
        .unwrap();
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_unauthorized_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})))
        .mount(&server)
        .await;

    let err = provider_for(&server, None)
        .chat(ChatRequest::single("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::AuthError(_)));
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
        .mount(&server)
        .await;

    let err = provider_for(&server, None)
        .chat(ChatRequest::single("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::RateLimited { retry_after_secs: 17 }));
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    match provider_for(&server, None)
        .chat(ChatRequest::single("hi"))
        .await
        .unwrap_err()
    {
        LLMError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = provider_for(&server, None)
        .chat(ChatRequest::single("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_empty_api_key_never_sends() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(0)
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new(
        String::new(),
        "gpt-4o".to_string(),
        4096,
        None,
        Some(server.uri()),
    );
    let err = provider.chat(ChatRequest::single("hi")).await.unwrap_err();
    assert!(matches!(err, LLMError::NotConfigured(_)));
}
