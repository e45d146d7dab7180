//! Persona Assembly
//!
//! Attaches identity and provenance to already-validated fields.

use super::personality::PersonalityTraits;
use super::types::{ParsedPersonaFields, Persona};
use chrono::Utc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default)]
pub struct PersonaAssembler;

impl PersonaAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assign a fresh id and creation time; generated personas are always
    /// synthetic and never verified.
    pub fn assemble(&self, fields: ParsedPersonaFields, personality: PersonalityTraits) -> Persona {
        Persona {
            id: Uuid::new_v4(),
            handle: fields.handle,
            display_name: fields.display_name,
            bio: fields.bio,
            gender: fields.gender,
            city: fields.city,
            personality,
            interests: fields.interests,
            created_at: Utc::now(),
            is_synthetic: true,
            is_verified: false,
        }
    }
}
