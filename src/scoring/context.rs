//! Scoring context for rule evaluation.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::constraints::DEFAULT_KEYWORD_URGENCY;

/// Read-only inputs shared by scoring rules and candidate ranking.
///
/// Built once per run from the planning snapshot; rules never mutate it.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    /// Reference instant for recency calculations.
    pub now: DateTime<Utc>,
    /// Keyword urgency (keyword_id → 0.0..1.0).
    pub keyword_urgency: HashMap<String, f64>,
    /// Last post per subreddit (name → instant).
    pub last_post_by_subreddit: HashMap<String, DateTime<Utc>>,
}

impl ScoringContext {
    /// Creates an empty context at the given time.
    pub fn at_time(now: DateTime<Utc>) -> Self {
        Self {
            now,
            keyword_urgency: HashMap::new(),
            last_post_by_subreddit: HashMap::new(),
        }
    }

    /// Sets urgency for a keyword.
    pub fn with_urgency(mut self, keyword_id: impl Into<String>, urgency: f64) -> Self {
        self.keyword_urgency.insert(keyword_id.into(), urgency);
        self
    }

    /// Sets the last post time for a subreddit.
    pub fn with_last_post(mut self, subreddit: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.last_post_by_subreddit.insert(subreddit.into(), at);
        self
    }

    /// Urgency of one keyword; unknown keywords are neutral.
    pub fn urgency(&self, keyword_id: &str) -> f64 {
        self.keyword_urgency
            .get(keyword_id)
            .copied()
            .unwrap_or(DEFAULT_KEYWORD_URGENCY)
    }

    /// Mean urgency over a keyword list. An empty list has no urgency (0.0).
    pub fn average_urgency(&self, keyword_ids: &[String]) -> f64 {
        if keyword_ids.is_empty() {
            return 0.0;
        }
        keyword_ids.iter().map(|k| self.urgency(k)).sum::<f64>() / keyword_ids.len() as f64
    }

    /// Fractional days since the subreddit was last posted to.
    pub fn days_since_last_post(&self, subreddit: &str) -> Option<f64> {
        self.last_post_by_subreddit
            .get(subreddit)
            .map(|last| (self.now - *last).num_seconds() as f64 / 86_400.0)
    }
}
