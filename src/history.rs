//! Persistence contract and per-run snapshot.
//!
//! The planner never talks to storage mid-run. [`PlanningSnapshot::capture`]
//! reads everything a run needs from a [`HistoryStore`] up front; the
//! scheduler and scorers then work on that snapshot only. Each run owns its
//! snapshot, so concurrent runs share no mutable state.
//!
//! Stores may keep topic embeddings apart from post rows; the snapshot
//! attaches them to history entries that arrive without one.
//!
//! # Keyword urgency
//! Urgency is a linear recency ramp: a keyword used just now scores 0,
//! one unused for [`URGENCY_RAMP_DAYS`] or more (or never used) scores 1.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::error::Result;
use crate::models::{CampaignConfig, PostHistory, TopicEmbedding};
use crate::scoring::ScoringContext;

/// History horizon read at the start of a run.
pub const HISTORY_WINDOW_DAYS: i64 = 30;

/// Window over which persona usage is counted.
pub const PERSONA_USAGE_WINDOW_DAYS: i64 = 30;

/// Days after which an unused keyword reaches full urgency.
pub const URGENCY_RAMP_DAYS: f64 = 14.0;

/// Read-only access to what was posted before.
pub trait HistoryStore {
    /// Posts from the 30 days before `now`, most recent first.
    fn history_last_30_days(&self, now: DateTime<Utc>) -> Result<Vec<PostHistory>>;

    /// Recency-decay urgency (0-1) of a keyword.
    fn keyword_urgency(&self, keyword_id: &str, now: DateTime<Utc>) -> Result<f64>;

    /// Number of posts in the last `days` days a persona took part in.
    fn persona_usage_count(&self, persona_id: &str, days: i64, now: DateTime<Utc>) -> Result<f64>;

    /// When the subreddit was last posted to, if ever.
    fn last_post_date_for_subreddit(&self, subreddit: &str) -> Result<Option<DateTime<Utc>>>;

    /// Topic embeddings of posts from the last `days` days.
    fn recent_topic_embeddings(&self, days: i64, now: DateTime<Utc>) -> Result<Vec<TopicEmbedding>>;
}

/// Everything a planning run reads from history, taken once.
#[derive(Debug, Clone)]
pub struct PlanningSnapshot {
    /// When the snapshot was taken; the run's notion of "now".
    pub captured_at: DateTime<Utc>,
    /// Recent posts (for cooldown and diversity checks).
    pub history: Vec<PostHistory>,
    /// Prior usage per persona ID.
    pub persona_usage: HashMap<String, f64>,
    /// Urgency per keyword ID.
    pub keyword_urgency: HashMap<String, f64>,
    /// Last post per subreddit.
    pub last_post_by_subreddit: HashMap<String, DateTime<Utc>>,
}

impl PlanningSnapshot {
    /// A snapshot with no history (first run of a campaign).
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            captured_at: now,
            history: Vec::new(),
            persona_usage: HashMap::new(),
            keyword_urgency: HashMap::new(),
            last_post_by_subreddit: HashMap::new(),
        }
    }

    /// Reads history, keyword urgency, persona usage and subreddit recency
    /// for every keyword, persona and subreddit in the campaign.
    pub fn capture<S: HistoryStore + ?Sized>(
        store: &S,
        config: &CampaignConfig,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let mut snapshot = Self::empty(now);
        snapshot.history = store.history_last_30_days(now)?;

        let mut embeddings: HashMap<String, Vec<f32>> = store
            .recent_topic_embeddings(HISTORY_WINDOW_DAYS, now)?
            .into_iter()
            .map(|t| (t.id, t.embedding))
            .collect();
        for post in snapshot.history.iter_mut().filter(|p| p.topic_embedding.is_none()) {
            post.topic_embedding = embeddings.remove(&post.id);
        }

        for keyword in &config.keywords {
            let urgency = store.keyword_urgency(&keyword.id, now)?;
            snapshot.keyword_urgency.insert(keyword.id.clone(), urgency);
        }
        for persona in &config.personas {
            let usage = store.persona_usage_count(&persona.id, PERSONA_USAGE_WINDOW_DAYS, now)?;
            snapshot.persona_usage.insert(persona.id.clone(), usage);
        }
        for subreddit in &config.subreddits {
            if let Some(last) = store.last_post_date_for_subreddit(&subreddit.name)? {
                snapshot
                    .last_post_by_subreddit
                    .insert(subreddit.name.clone(), last);
            }
        }

        debug!(
            history = snapshot.history.len(),
            keywords = snapshot.keyword_urgency.len(),
            personas = snapshot.persona_usage.len(),
            "captured planning snapshot"
        );
        Ok(snapshot)
    }

    pub fn with_history(mut self, history: Vec<PostHistory>) -> Self {
        self.history = history;
        self
    }

    pub fn with_persona_usage(mut self, persona_id: impl Into<String>, usage: f64) -> Self {
        self.persona_usage.insert(persona_id.into(), usage);
        self
    }

    pub fn with_keyword_urgency(mut self, keyword_id: impl Into<String>, urgency: f64) -> Self {
        self.keyword_urgency.insert(keyword_id.into(), urgency);
        self
    }

    pub fn with_last_post(mut self, subreddit: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.last_post_by_subreddit.insert(subreddit.into(), at);
        self
    }

    /// Scoring inputs derived from this snapshot.
    pub fn scoring_context(&self) -> ScoringContext {
        ScoringContext {
            now: self.captured_at,
            keyword_urgency: self.keyword_urgency.clone(),
            last_post_by_subreddit: self.last_post_by_subreddit.clone(),
        }
    }
}

/// In-memory [`HistoryStore`] over a list of published posts.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    posts: Vec<PostHistory>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a published post.
    pub fn record(&mut self, post: PostHistory) {
        self.posts.push(post);
    }

    pub fn with_post(mut self, post: PostHistory) -> Self {
        self.record(post);
        self
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn history_last_30_days(&self, now: DateTime<Utc>) -> Result<Vec<PostHistory>> {
        let cutoff = now - Duration::days(HISTORY_WINDOW_DAYS);
        let mut recent: Vec<PostHistory> = self
            .posts
            .iter()
            .filter(|p| p.posted_at >= cutoff)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(recent)
    }

    fn keyword_urgency(&self, keyword_id: &str, now: DateTime<Utc>) -> Result<f64> {
        let last_used = self
            .posts
            .iter()
            .filter(|p| p.posted_at <= now && p.keywords_used.iter().any(|k| k == keyword_id))
            .map(|p| p.posted_at)
            .max();

        Ok(match last_used {
            None => 1.0,
            Some(at) => {
                let days = (now - at).num_seconds() as f64 / 86_400.0;
                (days / URGENCY_RAMP_DAYS).clamp(0.0, 1.0)
            }
        })
    }

    fn persona_usage_count(&self, persona_id: &str, days: i64, now: DateTime<Utc>) -> Result<f64> {
        let cutoff = now - Duration::days(days);
        Ok(self
            .posts
            .iter()
            .filter(|p| p.posted_at >= cutoff && p.personas_used.iter().any(|id| id == persona_id))
            .count() as f64)
    }

    fn last_post_date_for_subreddit(&self, subreddit: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .posts
            .iter()
            .filter(|p| p.subreddit == subreddit)
            .map(|p| p.posted_at)
            .max())
    }

    fn recent_topic_embeddings(&self, days: i64, now: DateTime<Utc>) -> Result<Vec<TopicEmbedding>> {
        let cutoff = now - Duration::days(days);
        Ok(self
            .posts
            .iter()
            .filter(|p| p.posted_at >= cutoff)
            .filter_map(|p| {
                p.topic_embedding.as_ref().map(|embedding| TopicEmbedding {
                    id: p.id.clone(),
                    embedding: embedding.clone(),
                })
            })
            .collect())
    }
}
