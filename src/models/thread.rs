//! Post candidate, comment plan and thread models.
//!
//! A thread is the atomic scheduling unit: one original post plus an
//! ordered list of planned comments. Comment order is chronological;
//! index 0 is posted first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A proposed original post, before comments are planned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostCandidate {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Target community name.
    pub subreddit: String,
    /// Keyword IDs this post is meant to surface for.
    pub target_keywords: Vec<String>,
    /// Persona authoring the post (the OP).
    pub op_persona_id: String,
    /// Expected reach (0-100).
    pub potential_impact: f64,
    /// Topic embedding for diversity checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_embedding: Option<Vec<f32>>,
    pub generated_at: DateTime<Utc>,
}

impl PostCandidate {
    pub fn new(
        id: impl Into<String>,
        subreddit: impl Into<String>,
        op_persona_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            body: String::new(),
            subreddit: subreddit.into(),
            target_keywords: Vec::new(),
            op_persona_id: op_persona_id.into(),
            potential_impact: 0.0,
            topic_embedding: None,
            generated_at: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_keyword(mut self, keyword_id: impl Into<String>) -> Self {
        self.target_keywords.push(keyword_id.into());
        self
    }

    pub fn with_impact(mut self, impact: f64) -> Self {
        self.potential_impact = impact;
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.topic_embedding = Some(embedding);
        self
    }

    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }
}

/// What a comment replies to.
///
/// Serialized as the string `"root"` or the parent comment's ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReplyTarget {
    /// Top-level reply to the original post.
    Root,
    /// Reply to another comment in the same thread.
    Comment(String),
}

impl ReplyTarget {
    pub const ROOT: &'static str = "root";

    pub fn comment(id: impl Into<String>) -> Self {
        Self::Comment(id.into())
    }
}

impl From<String> for ReplyTarget {
    fn from(value: String) -> Self {
        if value == Self::ROOT {
            Self::Root
        } else {
            Self::Comment(value)
        }
    }
}

impl From<ReplyTarget> for String {
    fn from(value: ReplyTarget) -> Self {
        match value {
            ReplyTarget::Root => ReplyTarget::ROOT.to_string(),
            ReplyTarget::Comment(id) => id,
        }
    }
}

/// A planned comment within a thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentPlan {
    pub id: String,
    pub persona_id: String,
    pub text: String,
    pub reply_to: ReplyTarget,
    /// Delay after the post goes live.
    pub delay_minutes: u32,
    pub mentions_product: bool,
    /// How natural a product mention reads (0-1, higher = subtler).
    pub subtlety_score: f64,
}

impl CommentPlan {
    /// Creates a top-level comment.
    pub fn new(id: impl Into<String>, persona_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            persona_id: persona_id.into(),
            text: String::new(),
            reply_to: ReplyTarget::Root,
            delay_minutes: 0,
            mentions_product: false,
            subtlety_score: 0.0,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn replying_to(mut self, comment_id: impl Into<String>) -> Self {
        self.reply_to = ReplyTarget::comment(comment_id);
        self
    }

    pub fn with_delay(mut self, minutes: u32) -> Self {
        self.delay_minutes = minutes;
        self
    }

    /// Marks the comment as mentioning the product with the given subtlety.
    pub fn mentioning_product(mut self, subtlety_score: f64) -> Self {
        self.mentions_product = true;
        self.subtlety_score = subtlety_score;
        self
    }
}

/// Conversation shape requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStyle {
    /// OP asks for help; commenters answer.
    Question,
    /// OP asks for tool recommendations.
    Recommendation,
    /// OP weighs alternatives.
    Comparison,
    /// Open-ended discussion.
    Discussion,
}

impl ConversationStyle {
    /// All styles, in generation rotation order.
    pub const ALL: [ConversationStyle; 4] = [
        ConversationStyle::Question,
        ConversationStyle::Recommendation,
        ConversationStyle::Comparison,
        ConversationStyle::Discussion,
    ];

    /// Style for the `index`-th generated thread.
    pub fn rotation(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// A fully assembled thread: post plus ordered comments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPlan {
    pub id: String,
    pub post: PostCandidate,
    pub comments: Vec<CommentPlan>,
    pub conversation_style: ConversationStyle,
    /// Predicted engagement (0-100).
    pub estimated_engagement: f64,
}

impl ThreadPlan {
    pub fn new(id: impl Into<String>, post: PostCandidate) -> Self {
        Self {
            id: id.into(),
            post,
            comments: Vec::new(),
            conversation_style: ConversationStyle::Discussion,
            estimated_engagement: 0.0,
        }
    }

    pub fn with_comment(mut self, comment: CommentPlan) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn with_style(mut self, style: ConversationStyle) -> Self {
        self.conversation_style = style;
        self
    }

    pub fn with_engagement(mut self, engagement: f64) -> Self {
        self.estimated_engagement = engagement;
        self
    }

    /// The OP persona.
    pub fn op_persona_id(&self) -> &str {
        &self.post.op_persona_id
    }

    /// Target subreddit.
    pub fn subreddit(&self) -> &str {
        &self.post.subreddit
    }

    /// Distinct personas touched by this thread (OP and commenters).
    pub fn persona_ids(&self) -> BTreeSet<&str> {
        std::iter::once(self.post.op_persona_id.as_str())
            .chain(self.comments.iter().map(|c| c.persona_id.as_str()))
            .collect()
    }

    /// Finds a comment by ID.
    pub fn comment(&self, id: &str) -> Option<&CommentPlan> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Number of comments.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}
