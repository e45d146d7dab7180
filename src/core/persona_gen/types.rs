//! Persona Data Model
//!
//! Generated persona records, their interests, the demographic seed that
//! selects optional fields, and the response schema shared by the prompt
//! composer and the response parser.

use super::personality::PersonalityTraits;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Interests
// ============================================================================

/// Inclusive lower bound of an interest affinity.
pub const MIN_AFFINITY: f64 = -1.0;
/// Inclusive upper bound of an interest affinity.
pub const MAX_AFFINITY: f64 = 1.0;

/// A topic and the persona's signed disposition toward it.
///
/// Negative affinity is aversion, positive is enthusiasm; the magnitude is
/// the strength of the feeling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interest {
    #[serde(rename = "interest")]
    pub topic: String,
    #[serde(rename = "interestLevel")]
    pub affinity: f64,
}

impl Interest {
    pub fn new(topic: impl Into<String>, affinity: f64) -> Self {
        Self {
            topic: topic.into(),
            affinity,
        }
    }

    /// Whether `affinity` is a finite value inside `[-1.0, 1.0]`.
    pub fn is_valid_affinity(affinity: f64) -> bool {
        affinity.is_finite() && (MIN_AFFINITY..=MAX_AFFINITY).contains(&affinity)
    }

    pub fn is_aversion(&self) -> bool {
        self.affinity < 0.0
    }
}

// ============================================================================
// Persona
// ============================================================================

/// A generated synthetic social-media identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: Uuid,
    pub handle: String,
    pub display_name: String,
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub personality: PersonalityTraits,
    /// Generation order is preserved.
    pub interests: Vec<Interest>,
    pub created_at: DateTime<Utc>,
    pub is_synthetic: bool,
    pub is_verified: bool,
}

/// Validated fields decoded from a completion, before identity is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPersonaFields {
    pub handle: String,
    pub display_name: String,
    pub bio: String,
    pub interests: Vec<Interest>,
    pub city: Option<String>,
    pub gender: Option<String>,
}

// ============================================================================
// Demographic Seed
// ============================================================================

/// How an optional demographic field should be filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemographicField {
    /// Let the model choose a value that fits the persona.
    Generate,
    /// Use exactly this value.
    Fixed(String),
}

impl DemographicField {
    /// `Some(value)` pins the field, `None` leaves it to the model.
    pub fn from_hint(hint: Option<String>) -> Self {
        match hint {
            Some(value) if !value.trim().is_empty() => Self::Fixed(value),
            _ => Self::Generate,
        }
    }
}

/// Optional demographic fields requested for one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicSeed {
    pub city: Option<DemographicField>,
    pub gender: Option<DemographicField>,
}

impl DemographicSeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, field: DemographicField) -> Self {
        self.city = Some(field);
        self
    }

    pub fn with_gender(mut self, field: DemographicField) -> Self {
        self.gender = Some(field);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.gender.is_none()
    }
}

// ============================================================================
// Generation Request
// ============================================================================

/// Input bundle for one prompt. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub context: String,
    pub personality: PersonalityTraits,
    pub demographic: Option<DemographicSeed>,
}

impl GenerationRequest {
    pub fn new(context: impl Into<String>, personality: PersonalityTraits) -> Self {
        Self {
            context: context.into(),
            personality,
            demographic: None,
        }
    }

    pub fn with_demographic(mut self, demographic: Option<DemographicSeed>) -> Self {
        self.demographic = demographic.filter(|seed| !seed.is_empty());
        self
    }

    pub fn schema(&self) -> ResponseSchema {
        ResponseSchema::for_seed(self.demographic.as_ref())
    }
}

// ============================================================================
// Response Schema
// ============================================================================

pub const FIELD_HANDLE: &str = "handle";
pub const FIELD_DISPLAY_NAME: &str = "displayName";
pub const FIELD_BIO: &str = "bio";
pub const FIELD_CITY: &str = "city";
pub const FIELD_GENDER: &str = "gender";
pub const FIELD_INTERESTS: &str = "interests";
pub const FIELD_INTEREST_TOPIC: &str = "interest";
pub const FIELD_INTEREST_LEVEL: &str = "interestLevel";

/// The structured payload a completion must contain.
///
/// Rendered into the prompt by the composer and enforced by the parser, so
/// both always agree on one set of field names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseSchema {
    pub city: bool,
    pub gender: bool,
}

impl ResponseSchema {
    pub fn for_seed(seed: Option<&DemographicSeed>) -> Self {
        match seed {
            Some(seed) => Self {
                city: seed.city.is_some(),
                gender: seed.gender.is_some(),
            },
            None => Self::default(),
        }
    }

    /// Top-level string fields that must be present and non-empty.
    pub fn required_text_fields(&self) -> Vec<&'static str> {
        let mut fields = vec![FIELD_HANDLE, FIELD_DISPLAY_NAME, FIELD_BIO];
        if self.city {
            fields.push(FIELD_CITY);
        }
        if self.gender {
            fields.push(FIELD_GENDER);
        }
        fields
    }

    /// JSON skeleton shown to the model.
    pub fn render(&self) -> String {
        let mut lines = vec!["{".to_string()];
        for field in self.required_text_fields() {
            lines.push(format!("  \"{}\": \"string\",", field));
        }
        lines.push(format!(
            "  \"{}\": [{{\"{}\": \"string\", \"{}\": number}}]",
            FIELD_INTERESTS, FIELD_INTEREST_TOPIC, FIELD_INTEREST_LEVEL
        ));
        lines.push("}".to_string());
        lines.join("\n")
    }
}
