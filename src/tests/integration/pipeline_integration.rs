//! Persona pipeline integration tests
//!
//! Runs the whole chain from personality sampling to assembled persona, with
//! the real OpenAI provider pointed at a wiremock server, and checks
//! cancellation and timeout behaviour with a deliberately slow provider.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::core::llm::{GenerationClient, GenerationError, ProviderConfig};
use crate::core::persona_gen::{
    DemographicField, DemographicSeed, PersonaPipeline, PersonalityGenerator, PipelineError,
    TraitBound,
};
use crate::core::storage::{MemoryStore, ProfileRepository};
use crate::tests::mocks::{fenced_persona_json, SlowProvider};

const CONTEXT: &str = "The year is 2029. The Oklahoma City Thunder have won three straight titles.";

fn http_pipeline(server: &MockServer) -> PersonaPipeline {
    let provider = ProviderConfig::OpenAI {
        api_key: "sk-test".to_string(),
        model: "gpt-4o".to_string(),
        max_tokens: 4096,
        organization_id: None,
        base_url: Some(server.uri()),
    }
    .create_provider();

    PersonaPipeline::new(GenerationClient::new(provider))
        .with_personality_generator(PersonalityGenerator::seeded(TraitBound::default(), 2029))
}

fn completion(content: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "model": "gpt-4o",
        "choices": [{"message": {"role": "assistant", "content": content}, "finish_reason": "stop"}]
    }))
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(fenced_persona_json(40)))
        .expect(1)
        .mount(&server)
        .await;

    let persona = http_pipeline(&server).generate(CONTEXT, None, None).await.unwrap();

    assert_eq!(persona.handle, "okc_forever");
    assert_eq!(persona.interests.len(), 40);
    assert!(persona.interests.iter().all(|i| (-1.0..=1.0).contains(&i.affinity)));
    assert!(persona.personality.is_within(TraitBound::default()));
    assert!(persona.is_synthetic);
    assert!(!persona.is_verified);

    let store = MemoryStore::new();
    assert!(store.create_profile(persona.clone()).await.unwrap());
    assert_eq!(store.get_profile(persona.id).await.unwrap(), persona);
}

#[tokio::test]
async fn test_prompt_sent_is_the_composed_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(fenced_persona_json(3)))
        .mount(&server)
        .await;

    let pipeline = http_pipeline(&server);
    let seed = DemographicSeed::new().with_city(DemographicField::Fixed("Tulsa".into()));
    let request = pipeline.request(CONTEXT, Some(&seed));
    let expected_prompt = pipeline.compose(&request);

    // The canned reply lacks "city", so the run itself fails validation
    let err = pipeline.run(&request, None).await.unwrap_err();
    assert!(matches!(err, PipelineError::Parse(ref e) if e.field() == Some("city")));

    let received: Vec<Request> = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body: serde_json::Value = received[0].body_json().unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], expected_prompt.as_str());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = http_pipeline(&server).generate(CONTEXT, None, None).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Generation(GenerationError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_cancel_while_waiting_on_capability() {
    let provider = Arc::new(SlowProvider::new(Duration::from_secs(30), fenced_persona_json(3)));
    let pipeline = PersonaPipeline::new(GenerationClient::new(provider.clone()));

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = std::time::Instant::now();
    let err = pipeline.generate(CONTEXT, None, Some(&token)).await.unwrap_err();

    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(provider.completed(), 0);
}

#[tokio::test]
async fn test_slow_capability_times_out() {
    let provider = Arc::new(SlowProvider::new(Duration::from_secs(30), fenced_persona_json(3)));
    let client = GenerationClient::new(provider).with_timeout(Duration::from_millis(50));

    let err = PersonaPipeline::new(client)
        .generate(CONTEXT, None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Generation(GenerationError::TimedOut { millis: 50 })
    ));
}

#[tokio::test]
async fn test_concurrent_generations_share_one_pipeline() {
    let provider = Arc::new(SlowProvider::new(Duration::from_millis(20), fenced_persona_json(2)));
    let pipeline = Arc::new(PersonaPipeline::new(GenerationClient::new(provider.clone())));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.generate(CONTEXT, None, None).await })
        })
        .collect();

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap().unwrap().id);
    }
    assert_eq!(ids.len(), 8);
    assert_eq!(provider.completed(), 8);
}
