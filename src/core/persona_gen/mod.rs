//! Persona Generation Module
//!
//! Synthesizes social-media personas from a world-state prompt:
//!
//! ```text
//! PersonalityGenerator -> PromptComposer -> GenerationClient -> ResponseParser -> PersonaAssembler
//! ```
//!
//! Every stage except the completion call is a pure transformation. A
//! pipeline holds no state between generations apart from its random
//! source, so independent generations may run concurrently against one
//! shared `PersonaPipeline`.

pub mod assembler;
pub mod errors;
pub mod parser;
pub mod personality;
pub mod prompts;
pub mod types;

pub use assembler::PersonaAssembler;
pub use errors::{ParseError, PipelineError, Result};
pub use parser::{strip_code_fence, ResponseParser, DEFAULT_MIN_INTERESTS};
pub use personality::{PersonalityGenerator, PersonalityTraits, TraitBound, DEFAULT_TRAIT_BOUND};
pub use prompts::{PromptComposer, PromptText, DEFAULT_REQUESTED_INTERESTS};
pub use types::{
    DemographicField, DemographicSeed, GenerationRequest, Interest, ParsedPersonaFields, Persona,
    ResponseSchema,
};

use crate::core::llm::GenerationClient;
use std::sync::{Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

// ============================================================================
// Pipeline
// ============================================================================

/// End-to-end persona generator.
///
/// The composer always describes the range the personality generator
/// samples from; whichever of the two is set last, the generator's bound wins.
pub struct PersonaPipeline {
    personalities: Mutex<PersonalityGenerator>,
    composer: PromptComposer,
    client: GenerationClient,
    assembler: PersonaAssembler,
    min_interests: usize,
}

impl PersonaPipeline {
    pub fn new(client: GenerationClient) -> Self {
        Self {
            personalities: Mutex::new(PersonalityGenerator::default()),
            composer: PromptComposer::default(),
            client,
            assembler: PersonaAssembler::new(),
            min_interests: DEFAULT_MIN_INTERESTS,
        }
    }

    pub fn with_personality_generator(mut self, generator: PersonalityGenerator) -> Self {
        self.composer = self.composer.with_trait_bound(generator.bound());
        self.personalities = Mutex::new(generator);
        self
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer.with_trait_bound(self.trait_bound());
        self
    }

    /// Range every sampled trait score falls in.
    pub fn trait_bound(&self) -> TraitBound {
        self.personalities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .bound()
    }

    pub fn with_min_interests(mut self, min_interests: usize) -> Self {
        self.min_interests = min_interests;
        self
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    /// Draw the next personality from the pipeline's random source.
    pub fn sample_personality(&self) -> PersonalityTraits {
        self.personalities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate()
    }

    /// Build a request with a freshly sampled personality.
    pub fn request(
        &self,
        context: &str,
        demographic: Option<&DemographicSeed>,
    ) -> GenerationRequest {
        GenerationRequest::new(context, self.sample_personality())
            .with_demographic(demographic.cloned())
    }

    pub fn compose(&self, request: &GenerationRequest) -> PromptText {
        self.composer.compose_request(request)
    }

    /// Parser matching the schema the request asked for.
    pub fn parser_for(&self, request: &GenerationRequest) -> ResponseParser {
        ResponseParser::new(request.schema()).with_min_interests(self.min_interests)
    }

    /// Generate one persona for `context` with a random personality.
    pub async fn generate(
        &self,
        context: &str,
        demographic: Option<&DemographicSeed>,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Persona> {
        let request = self.request(context, demographic);
        self.run(&request, cancellation).await
    }

    /// Run the pipeline for a prepared request.
    pub async fn run(
        &self,
        request: &GenerationRequest,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Persona> {
        log::debug!("Generating persona with personality [{}]", request.personality);

        let prompt = self.compose(request);
        let raw = self.client.complete(prompt.as_str(), cancellation).await?;

        let fields = self.parser_for(request).parse(&raw).map_err(|e| {
            log::warn!("Rejected completion: {}", e);
            e
        })?;

        let persona = self.assembler.assemble(fields, request.personality);
        log::info!(
            "Generated persona @{} ({} interests)",
            persona.handle,
            persona.interests.len()
        );
        Ok(persona)
    }
}
