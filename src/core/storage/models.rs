//! Post records owned by generated personas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{Result, StorageError};

pub const MIN_SENTIMENT: f64 = -1.0;
pub const MAX_SENTIMENT: f64 = 1.0;

/// Topic classification attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPostMetadata")]
pub struct PostMetadata {
    pub main_topic: String,
    sentiment: f64,
    pub tangential_topics: Vec<String>,
}

/// Unchecked wire form; decoding goes through `PostMetadata::new`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPostMetadata {
    main_topic: String,
    sentiment: f64,
    #[serde(default)]
    tangential_topics: Vec<String>,
}

impl TryFrom<RawPostMetadata> for PostMetadata {
    type Error = StorageError;

    fn try_from(raw: RawPostMetadata) -> Result<Self> {
        Self::new(raw.main_topic, raw.sentiment, raw.tangential_topics)
    }
}

impl PostMetadata {
    /// Fails when `sentiment` is not a finite value in `[-1, 1]`.
    pub fn new(
        main_topic: impl Into<String>,
        sentiment: f64,
        tangential_topics: Vec<String>,
    ) -> Result<Self> {
        if !sentiment.is_finite() || !(MIN_SENTIMENT..=MAX_SENTIMENT).contains(&sentiment) {
            return Err(StorageError::invalid(
                "post metadata",
                format!("sentiment {sentiment} outside [-1, 1]"),
            ));
        }
        Ok(Self {
            main_topic: main_topic.into(),
            sentiment,
            tangential_topics,
        })
    }

    pub fn sentiment(&self) -> f64 {
        self.sentiment
    }
}

/// A short-form post authored by a persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<Uuid>,
    pub metadata: PostMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(profile_id: Uuid, content: impl Into<String>, metadata: PostMetadata) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            profile_id,
            content: content.into(),
            media_url: None,
            reply_to_id: None,
            quote_id: None,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn replying_to(mut self, post_id: Uuid) -> Self {
        self.reply_to_id = Some(post_id);
        self
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to_id.is_some()
    }
}
