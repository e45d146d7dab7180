//! Persona Prompt Composition
//!
//! Renders world context, personality and the response schema into the
//! single instruction message sent to the completion capability. Output is a
//! pure function of the inputs.

use super::personality::{PersonalityTraits, TraitBound};
use super::types::{
    DemographicField, DemographicSeed, GenerationRequest, ResponseSchema, FIELD_INTERESTS,
    FIELD_INTEREST_LEVEL, MAX_AFFINITY, MIN_AFFINITY,
};
use std::fmt;
use std::ops::Deref;

pub const DEFAULT_REQUESTED_INTERESTS: usize = 40;
const MAX_BIO_CHARS: usize = 160;

// ============================================================================
// Prompt Text
// ============================================================================

/// A fully composed prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptText(String);

impl PromptText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for PromptText {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for PromptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PromptText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Composer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptComposer {
    requested_interests: usize,
    trait_bound: TraitBound,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTED_INTERESTS, TraitBound::default())
    }
}

impl PromptComposer {
    pub fn new(requested_interests: usize, trait_bound: TraitBound) -> Self {
        Self {
            requested_interests: requested_interests.max(1),
            trait_bound,
        }
    }

    /// Same composer, describing trait scores on `-bound..=bound`.
    pub fn with_trait_bound(mut self, bound: TraitBound) -> Self {
        self.trait_bound = bound;
        self
    }

    pub fn requested_interests(&self) -> usize {
        self.requested_interests
    }

    pub fn trait_bound(&self) -> TraitBound {
        self.trait_bound
    }

    pub fn compose_request(&self, request: &GenerationRequest) -> PromptText {
        self.compose(
            &request.context,
            &request.personality,
            request.demographic.as_ref(),
        )
    }

    pub fn compose(
        &self,
        context: &str,
        personality: &PersonalityTraits,
        demographic: Option<&DemographicSeed>,
    ) -> PromptText {
        let schema = ResponseSchema::for_seed(demographic);
        let bound = self.trait_bound.get();

        let mut prompt = String::from(
            "You are creating a fictional user of a simulated social network. \
             The user must feel like a real person living in the world described below.\n",
        );

        prompt.push_str("\nWORLD STATE:\n");
        prompt.push_str(context);
        prompt.push('\n');

        prompt.push_str(&format!(
            "\nPERSONALITY (Big Five, each trait scored from -{bound} (very low) to {bound} (very high)):\n"
        ));
        for (name, score) in personality.labelled() {
            prompt.push_str(&format!("- {name}: {score}\n"));
        }

        if let Some(seed) = demographic.filter(|seed| !seed.is_empty()) {
            prompt.push_str("\nDEMOGRAPHICS:\n");
            if let Some(city) = &seed.city {
                prompt.push_str(&demographic_line("city", "city they live in", city));
            }
            if let Some(gender) = &seed.gender {
                prompt.push_str(&demographic_line("gender", "gender", gender));
            }
        }

        prompt.push_str(&format!(
            "\nINSTRUCTIONS:\n\
             1. Invent a handle (no leading @, no spaces), a display name, and a bio of at most {MAX_BIO_CHARS} characters. \
             All three must fit the personality and the world state.\n\
             2. List at least {count} entries in \"{interests}\". Each entry names one topic and gives an \"{level}\" \
             between {min:.1} and {max:.1}. Negative values mean dislike or derision, positive values mean enthusiasm, \
             and the magnitude is how strongly the user feels.\n\
             3. Keep the interests consistent with each other: rival teams, opposing ideologies and competing brands \
             get opposed levels, while related affiliations get aligned levels.\n\
             4. Respond with a single JSON object and nothing else, using exactly these field names:\n",
            count = self.requested_interests,
            interests = FIELD_INTERESTS,
            level = FIELD_INTEREST_LEVEL,
            min = MIN_AFFINITY,
            max = MAX_AFFINITY,
        ));
        prompt.push_str(&schema.render());
        prompt.push('\n');

        PromptText(prompt)
    }
}

fn demographic_line(field: &str, description: &str, value: &DemographicField) -> String {
    match value {
        DemographicField::Generate => {
            format!("- \"{field}\": choose a {description} that fits this user\n")
        }
        DemographicField::Fixed(fixed) => {
            format!("- \"{field}\": use exactly \"{fixed}\"\n")
        }
    }
}
