//! Campaign configuration and reference data.
//!
//! Keywords, personas and subreddits are immutable for the duration of a
//! planning run. Usage counts and urgency are not stored here; they are
//! derived from history and passed to the scheduler as lookup maps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A search keyword the campaign wants to be visible for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    /// Unique keyword identifier.
    pub id: String,
    /// The search term itself.
    pub term: String,
    /// Business priority (1-10, higher = more important).
    pub priority_score: u8,
    /// Estimated monthly search volume, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_volume: Option<u64>,
}

impl Keyword {
    /// Creates a keyword with mid priority.
    pub fn new(id: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            priority_score: 5,
            search_volume: None,
        }
    }

    /// Sets the priority score.
    pub fn with_priority(mut self, priority_score: u8) -> Self {
        self.priority_score = priority_score;
        self
    }

    /// Sets the search volume.
    pub fn with_search_volume(mut self, volume: u64) -> Self {
        self.search_volume = Some(volume);
        self
    }
}

/// An account voice used to author posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub username: String,
    pub writing_style: String,
    pub expertise: Vec<String>,
    pub tone: String,
}

impl Persona {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            writing_style: String::new(),
            expertise: Vec::new(),
            tone: String::new(),
        }
    }

    pub fn with_writing_style(mut self, style: impl Into<String>) -> Self {
        self.writing_style = style.into();
        self
    }

    pub fn with_expertise(mut self, area: impl Into<String>) -> Self {
        self.expertise.push(area.into());
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }
}

/// A community the campaign posts into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subreddit {
    /// Community name (e.g. `r/PowerPoint`). Used as the identity key.
    pub name: String,
    pub typical_topics: Vec<String>,
    pub audience_type: String,
}

impl Subreddit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typical_topics: Vec::new(),
            audience_type: String::new(),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.typical_topics.push(topic.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience_type = audience.into();
        self
    }
}

fn default_candidate_multiplier() -> usize {
    2
}

/// Configuration for one campaign's weekly planning run.
///
/// Deserialized from the JSON the HTTP layer receives (camelCase keys).
/// Structural checks live in [`crate::validation::validate_campaign`];
/// the scheduler itself assumes a validated config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignConfig {
    /// Campaign identifier (carried onto the calendar).
    pub campaign_id: String,
    /// Product being promoted (passed to the quality reviewer).
    pub product_name: String,
    /// Start of the planning week (normally a Monday at midnight UTC).
    pub week_start: DateTime<Utc>,
    /// Number of slots to plan for the week.
    pub posts_per_week: usize,
    pub personas: Vec<Persona>,
    pub subreddits: Vec<Subreddit>,
    pub keywords: Vec<Keyword>,
    /// Threads generated per slot by the pipeline (oversampling factor).
    #[serde(default = "default_candidate_multiplier")]
    pub candidate_multiplier: usize,
    /// Minimum reviewer score a thread needs on top of passing review.
    #[serde(default)]
    pub min_quality_score: f64,
}

impl CampaignConfig {
    /// Creates a config with no reference data.
    pub fn new(
        campaign_id: impl Into<String>,
        week_start: DateTime<Utc>,
        posts_per_week: usize,
    ) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            product_name: String::new(),
            week_start,
            posts_per_week,
            personas: Vec::new(),
            subreddits: Vec::new(),
            keywords: Vec::new(),
            candidate_multiplier: default_candidate_multiplier(),
            min_quality_score: 0.0,
        }
    }

    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.personas.push(persona);
        self
    }

    pub fn with_subreddit(mut self, subreddit: Subreddit) -> Self {
        self.subreddits.push(subreddit);
        self
    }

    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.push(keyword);
        self
    }

    pub fn with_candidate_multiplier(mut self, multiplier: usize) -> Self {
        self.candidate_multiplier = multiplier;
        self
    }

    pub fn with_min_quality_score(mut self, score: f64) -> Self {
        self.min_quality_score = score;
        self
    }

    /// Looks up a persona by ID.
    pub fn persona(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    /// Looks up a subreddit by name.
    pub fn subreddit(&self, name: &str) -> Option<&Subreddit> {
        self.subreddits.iter().find(|s| s.name == name)
    }

    /// Number of threads the pipeline should generate for this week.
    pub fn generation_budget(&self) -> usize {
        self.posts_per_week.saturating_mul(self.candidate_multiplier)
    }
}
