//! Built-in thread scoring rules.
//!
//! | Rule | Signal |
//! |------|--------|
//! | ENGAGEMENT | Predicted engagement, normalized from 0-100 |
//! | KEYWORD_URGENCY | Mean urgency of the post's target keywords |
//! | COMMENT_DEPTH | Comment count, saturating at 4 |
//! | PRODUCT_SUBTLETY | Mean subtlety of comments that mention the product |
//!
//! All rules return values in [0, 1], higher = better.

use super::{RuleScore, ScoringContext, ScoringRule};
use crate::models::ThreadPlan;

/// Comment count at which [`CommentDepth`] saturates.
pub const FULL_CONVERSATION_COMMENTS: f64 = 4.0;

/// Predicted engagement.
#[derive(Debug, Clone, Copy)]
pub struct Engagement;

impl ScoringRule for Engagement {
    fn name(&self) -> &'static str {
        "ENGAGEMENT"
    }

    fn evaluate(&self, thread: &ThreadPlan, _context: &ScoringContext) -> RuleScore {
        (thread.estimated_engagement / 100.0).clamp(0.0, 1.0)
    }

    fn description(&self) -> &'static str {
        "Estimated engagement (0-100) scaled to 0-1"
    }
}

/// How overdue the thread's keywords are.
///
/// Threads without target keywords score 0.
#[derive(Debug, Clone, Copy)]
pub struct KeywordUrgency;

impl ScoringRule for KeywordUrgency {
    fn name(&self) -> &'static str {
        "KEYWORD_URGENCY"
    }

    fn evaluate(&self, thread: &ThreadPlan, context: &ScoringContext) -> RuleScore {
        context.average_urgency(&thread.post.target_keywords)
    }

    fn description(&self) -> &'static str {
        "Mean urgency of target keywords"
    }
}

/// Conversation depth.
#[derive(Debug, Clone, Copy)]
pub struct CommentDepth;

impl ScoringRule for CommentDepth {
    fn name(&self) -> &'static str {
        "COMMENT_DEPTH"
    }

    fn evaluate(&self, thread: &ThreadPlan, _context: &ScoringContext) -> RuleScore {
        (thread.comment_count() as f64 / FULL_CONVERSATION_COMMENTS).min(1.0)
    }

    fn description(&self) -> &'static str {
        "Comment count relative to a full conversation"
    }
}

/// How naturally the product is mentioned.
///
/// Threads where no comment mentions the product score 0.
#[derive(Debug, Clone, Copy)]
pub struct ProductSubtlety;

impl ScoringRule for ProductSubtlety {
    fn name(&self) -> &'static str {
        "PRODUCT_SUBTLETY"
    }

    fn evaluate(&self, thread: &ThreadPlan, _context: &ScoringContext) -> RuleScore {
        let (sum, count) = thread
            .comments
            .iter()
            .filter(|c| c.mentions_product)
            .fold((0.0, 0usize), |(sum, n), c| (sum + c.subtlety_score, n + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    fn description(&self) -> &'static str {
        "Mean subtlety of product-mentioning comments"
    }
}
