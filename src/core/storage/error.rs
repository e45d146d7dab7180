//! Error types for the storage module.

use thiserror::Error;
use uuid::Uuid;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Record not found.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    /// Record failed validation before being stored.
    #[error("Invalid {kind}: {reason}")]
    Invalid { kind: &'static str, reason: String },
}

impl StorageError {
    pub fn profile_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "profile", id }
    }

    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "post", id }
    }

    pub fn invalid(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
