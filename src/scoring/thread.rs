//! Thread scorer: slot-independent priority for the greedy search.
//!
//! Default weights:
//!
//! ```text
//! score = engagement * 0.30 + keyword_urgency * 0.40
//!       + comment_depth * 0.15 + product_subtlety * 0.15
//! ```

use super::{rules, RuleContribution, ScoreEngine, ScoringContext};
use crate::models::ThreadPlan;

/// Scores assembled threads.
#[derive(Debug, Clone)]
pub struct ThreadScorer {
    engine: ScoreEngine,
}

impl ThreadScorer {
    pub const ENGAGEMENT_WEIGHT: f64 = 0.3;
    pub const URGENCY_WEIGHT: f64 = 0.4;
    pub const DEPTH_WEIGHT: f64 = 0.15;
    pub const SUBTLETY_WEIGHT: f64 = 0.15;

    /// Uses a custom rule mix.
    pub fn with_engine(engine: ScoreEngine) -> Self {
        Self { engine }
    }

    /// Scalar priority of a thread.
    pub fn score(&self, thread: &ThreadPlan, context: &ScoringContext) -> f64 {
        self.engine.score(thread, context)
    }

    /// Per-rule contributions.
    pub fn breakdown(&self, thread: &ThreadPlan, context: &ScoringContext) -> Vec<RuleContribution> {
        self.engine.breakdown(thread, context)
    }

    /// Thread indices paired with scores, highest first (stable on ties).
    pub fn rank(&self, threads: &[ThreadPlan], context: &ScoringContext) -> Vec<(usize, f64)> {
        self.engine
            .sort_indices(threads, context)
            .into_iter()
            .map(|i| (i, self.engine.score(&threads[i], context)))
            .collect()
    }
}

impl Default for ThreadScorer {
    fn default() -> Self {
        Self::with_engine(
            ScoreEngine::new()
                .with_rule(rules::Engagement, Self::ENGAGEMENT_WEIGHT)
                .with_rule(rules::KeywordUrgency, Self::URGENCY_WEIGHT)
                .with_rule(rules::CommentDepth, Self::DEPTH_WEIGHT)
                .with_rule(rules::ProductSubtlety, Self::SUBTLETY_WEIGHT),
        )
    }
}
