//! Scoring rules for candidate posts and assembled threads.
//!
//! Two independent priorities live here:
//!
//! - **Candidate ranking** decides which raw post candidates are expanded
//!   into full threads first (`impact`, `urgency`, subreddit `diversity`).
//! - **Thread scoring** gives each assembled thread a slot-independent
//!   priority that orders the greedy placement search.
//!
//! Thread scores are a weighted sum of [`ScoringRule`]s composed in a
//! [`ScoreEngine`]; [`ThreadScorer::default`] carries the standard weights.
//!
//! # Usage
//!
//! ```
//! use content_planner::scoring::{ScoreEngine, ScoringContext, ThreadScorer};
//! use content_planner::scoring::rules;
//! use chrono::Utc;
//!
//! // Standard weights
//! let scorer = ThreadScorer::default();
//!
//! // Custom engagement-heavy mix
//! let engine = ScoreEngine::new()
//!     .with_rule(rules::Engagement, 0.7)
//!     .with_rule(rules::KeywordUrgency, 0.3);
//! let custom = ThreadScorer::with_engine(engine);
//!
//! let context = ScoringContext::at_time(Utc::now());
//! // let score = scorer.score(&thread, &context);
//! ```

mod candidate;
mod context;
mod engine;
pub mod rules;
mod thread;

pub use candidate::{rank_candidates, score_candidate, CandidateBreakdown, ScoredCandidate};
pub use context::ScoringContext;
pub use engine::{RuleContribution, ScoreEngine};
pub use thread::ThreadScorer;

use crate::models::ThreadPlan;
use std::fmt::Debug;

/// Score returned by a scoring rule.
///
/// Rules return values in [0, 1]. **Higher = better**: these are quality
/// signals, not costs.
pub type RuleScore = f64;

/// A named signal evaluated on an assembled thread.
pub trait ScoringRule: Send + Sync + Debug {
    /// Short rule name (e.g. "ENGAGEMENT").
    fn name(&self) -> &'static str;

    /// Evaluates the thread. Returns a value in [0, 1], higher = better.
    fn evaluate(&self, thread: &ThreadPlan, context: &ScoringContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
