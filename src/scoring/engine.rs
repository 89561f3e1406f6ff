//! Weighted rule engine for thread scoring.
//!
//! Composes scoring rules into a single scalar and exposes the per-rule
//! breakdown for explainability.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{RuleScore, ScoringContext, ScoringRule};
use crate::models::ThreadPlan;

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn ScoringRule>,
    weight: f64,
}

/// One rule's share of a thread score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleContribution {
    pub rule: String,
    pub weight: f64,
    /// Raw rule score (0.0..1.0).
    pub score: RuleScore,
    /// `weight * score`.
    pub contribution: f64,
}

/// A weighted combination of scoring rules.
///
/// # Example
/// ```
/// use content_planner::scoring::ScoreEngine;
/// use content_planner::scoring::rules;
///
/// let engine = ScoreEngine::new()
///     .with_rule(rules::Engagement, 0.5)
///     .with_rule(rules::CommentDepth, 0.5);
/// assert_eq!(engine.rule_count(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ScoreEngine {
    rules: Vec<WeightedRule>,
}

impl ScoreEngine {
    /// Creates an empty engine (every thread scores 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule with the given weight.
    pub fn with_rule<R: ScoringRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Number of rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Weighted sum of all rule scores.
    pub fn score(&self, thread: &ThreadPlan, context: &ScoringContext) -> f64 {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(thread, context) * wr.weight)
            .sum()
    }

    /// Per-rule contributions, in rule order.
    pub fn breakdown(&self, thread: &ThreadPlan, context: &ScoringContext) -> Vec<RuleContribution> {
        self.rules
            .iter()
            .map(|wr| {
                let score = wr.rule.evaluate(thread, context);
                RuleContribution {
                    rule: wr.rule.name().to_string(),
                    weight: wr.weight,
                    score,
                    contribution: score * wr.weight,
                }
            })
            .collect()
    }

    /// Thread indices sorted by score, highest first.
    ///
    /// Stable: equal scores keep input order.
    pub fn sort_indices(&self, threads: &[ThreadPlan], context: &ScoringContext) -> Vec<usize> {
        let scores: Vec<f64> = threads.iter().map(|t| self.score(t, context)).collect();
        let mut indices: Vec<usize> = (0..threads.len()).collect();
        indices.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        indices
    }
}

impl std::fmt::Debug for ScoreEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
