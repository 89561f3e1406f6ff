//! Post history model.
//!
//! Read-only record of what was actually posted in earlier weeks,
//! supplied by the persistence collaborator. Used for the cross-week
//! subreddit cooldown and topic diversity checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One previously published post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostHistory {
    pub id: String,
    pub subreddit: String,
    pub posted_at: DateTime<Utc>,
    /// Keyword IDs the post targeted.
    pub keywords_used: Vec<String>,
    /// Personas that took part (OP and commenters).
    pub personas_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_embedding: Option<Vec<f32>>,
}

impl PostHistory {
    pub fn new(subreddit: impl Into<String>, posted_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subreddit: subreddit.into(),
            posted_at,
            keywords_used: Vec::new(),
            personas_used: Vec::new(),
            topic_embedding: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_keyword(mut self, keyword_id: impl Into<String>) -> Self {
        self.keywords_used.push(keyword_id.into());
        self
    }

    pub fn with_persona(mut self, persona_id: impl Into<String>) -> Self {
        self.personas_used.push(persona_id.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.topic_embedding = Some(embedding);
        self
    }
}

/// A stored topic embedding of a published post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicEmbedding {
    /// ID of the [`PostHistory`] entry it belongs to.
    pub id: String,
    pub embedding: Vec<f32>,
}
