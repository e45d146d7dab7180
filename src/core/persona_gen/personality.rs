//! Big Five Personality Synthesis
//!
//! Produces bounded, uniformly sampled trait vectors. The random source is a
//! type parameter so tests can inject a seeded generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_TRAIT_BOUND: u8 = 5;
/// Largest bound that still fits an `i8` score.
pub const MAX_TRAIT_BOUND: u8 = 100;

pub const TRAIT_NAMES: [&str; 5] = [
    "Openness",
    "Conscientiousness",
    "Extraversion",
    "Agreeableness",
    "Neuroticism",
];

// ============================================================================
// Trait Bound
// ============================================================================

/// Symmetric range `-bound..=bound` for every trait score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TraitBound(u8);

impl TraitBound {
    /// Returns `None` for zero or anything above `MAX_TRAIT_BOUND`.
    pub fn new(bound: u8) -> Option<Self> {
        (1..=MAX_TRAIT_BOUND).contains(&bound).then_some(Self(bound))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, score: i8) -> bool {
        let b = self.0 as i16;
        (-b..=b).contains(&(score as i16))
    }
}

impl Default for TraitBound {
    fn default() -> Self {
        Self(DEFAULT_TRAIT_BOUND)
    }
}

impl TryFrom<u8> for TraitBound {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
            .ok_or_else(|| format!("trait bound must be in 1..={MAX_TRAIT_BOUND}, got {value}"))
    }
}

impl From<TraitBound> for u8 {
    fn from(bound: TraitBound) -> Self {
        bound.0
    }
}

// ============================================================================
// Personality Traits
// ============================================================================

/// Five independent Big Five scores. Fixed once generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityTraits {
    openness: i8,
    conscientiousness: i8,
    extraversion: i8,
    agreeableness: i8,
    neuroticism: i8,
}

impl PersonalityTraits {
    pub fn new(
        openness: i8,
        conscientiousness: i8,
        extraversion: i8,
        agreeableness: i8,
        neuroticism: i8,
    ) -> Self {
        Self {
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        }
    }

    pub fn openness(&self) -> i8 {
        self.openness
    }

    pub fn conscientiousness(&self) -> i8 {
        self.conscientiousness
    }

    pub fn extraversion(&self) -> i8 {
        self.extraversion
    }

    pub fn agreeableness(&self) -> i8 {
        self.agreeableness
    }

    pub fn neuroticism(&self) -> i8 {
        self.neuroticism
    }

    /// Scores in `TRAIT_NAMES` order.
    pub fn scores(&self) -> [i8; 5] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }

    pub fn labelled(&self) -> [(&'static str, i8); 5] {
        let scores = self.scores();
        std::array::from_fn(|i| (TRAIT_NAMES[i], scores[i]))
    }

    pub fn is_within(&self, bound: TraitBound) -> bool {
        self.scores().iter().all(|&score| bound.contains(score))
    }
}

impl fmt::Display for PersonalityTraits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .labelled()
            .iter()
            .map(|(name, score)| format!("{name}: {score}"))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Uniform, independent sampler for `PersonalityTraits`.
pub struct PersonalityGenerator<R = StdRng> {
    rng: R,
    bound: TraitBound,
}

impl PersonalityGenerator<StdRng> {
    /// Entropy-seeded generator.
    pub fn new(bound: TraitBound) -> Self {
        Self::with_rng(StdRng::from_entropy(), bound)
    }

    /// Deterministic generator for reproducible runs.
    pub fn seeded(bound: TraitBound, seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), bound)
    }
}

impl Default for PersonalityGenerator<StdRng> {
    fn default() -> Self {
        Self::new(TraitBound::default())
    }
}

impl<R: Rng> PersonalityGenerator<R> {
    pub fn with_rng(rng: R, bound: TraitBound) -> Self {
        Self { rng, bound }
    }

    pub fn bound(&self) -> TraitBound {
        self.bound
    }

    pub fn generate(&mut self) -> PersonalityTraits {
        let b = self.bound.get() as i8;
        let rng = &mut self.rng;
        PersonalityTraits::new(
            rng.gen_range(-b..=b),
            rng.gen_range(-b..=b),
            rng.gen_range(-b..=b),
            rng.gen_range(-b..=b),
            rng.gen_range(-b..=b),
        )
    }
}
