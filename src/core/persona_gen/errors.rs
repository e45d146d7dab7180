//! Persona Generation Error Types
//!
//! Every failure is terminal for the attempt that produced it; callers that
//! want retries wrap the pipeline themselves.

use crate::core::llm::GenerationError;
use thiserror::Error;

// ============================================================================
// Parse Errors
// ============================================================================

/// Errors raised while turning raw completion text into persona fields.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The payload could not be decoded as a JSON object.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Decoded, but a field is missing, mistyped, or out of range.
    #[error("Schema violation at '{field}': {constraint}")]
    SchemaViolation { field: String, constraint: String },
}

impl ParseError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload(reason.into())
    }

    pub fn schema_violation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Path of the offending field for schema violations.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SchemaViolation { field, .. } => Some(field),
            Self::MalformedPayload(_) => None,
        }
    }
}

// ============================================================================
// Pipeline Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Response rejected: {0}")]
    Parse(#[from] ParseError),
}

impl PipelineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Generation(e) if e.is_cancelled())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
