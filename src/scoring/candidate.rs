//! Candidate ranking: which raw posts get expanded into threads first.
//!
//! ```text
//! score = impact * 0.40 + urgency * 0.35 + diversity * 0.25
//!
//! impact    = potential_impact / 100
//! urgency   = mean keyword urgency
//! diversity = min(1, days since last post in the subreddit / 7), 1 if never posted
//! ```
//!
//! This is an ordering concern only; it never affects feasibility.

use serde::{Deserialize, Serialize};

use super::ScoringContext;
use crate::models::PostCandidate;

const IMPACT_WEIGHT: f64 = 0.4;
const URGENCY_WEIGHT: f64 = 0.35;
const DIVERSITY_WEIGHT: f64 = 0.25;
const DIVERSITY_HORIZON_DAYS: f64 = 7.0;

/// Per-term scores behind a candidate's rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateBreakdown {
    pub impact: f64,
    pub urgency: f64,
    pub diversity: f64,
}

impl CandidateBreakdown {
    /// Weighted total.
    pub fn total(&self) -> f64 {
        self.impact * IMPACT_WEIGHT
            + self.urgency * URGENCY_WEIGHT
            + self.diversity * DIVERSITY_WEIGHT
    }
}

/// A candidate tagged with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: PostCandidate,
    pub score: f64,
    pub breakdown: CandidateBreakdown,
}

/// Scores one candidate.
pub fn score_candidate(candidate: &PostCandidate, context: &ScoringContext) -> CandidateBreakdown {
    let diversity = context
        .days_since_last_post(&candidate.subreddit)
        .map_or(1.0, |days| (days / DIVERSITY_HORIZON_DAYS).clamp(0.0, 1.0));

    CandidateBreakdown {
        impact: (candidate.potential_impact / 100.0).clamp(0.0, 1.0),
        urgency: context.average_urgency(&candidate.target_keywords),
        diversity,
    }
}

/// Ranks candidates by score, highest first. Ties keep input order.
pub fn rank_candidates(candidates: &[PostCandidate], context: &ScoringContext) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|c| {
            let breakdown = score_candidate(c, context);
            ScoredCandidate {
                candidate: c.clone(),
                score: breakdown.total(),
                breakdown,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}
