//! Input validation at the planning boundary.
//!
//! Checks campaign configuration and generated threads before anything is
//! scheduled. The scheduler itself trusts its inputs; these checks run in
//! the pipeline only. Detects:
//! - Non-positive limits
//! - Duplicate IDs
//! - Empty persona or keyword lists
//! - Values outside their documented ranges
//! - Threads referencing unknown personas or subreddits
//! - Replies to comments that do not precede them
//!
//! Every problem is collected; validation never stops at the first.

use std::collections::HashSet;
use thiserror::Error;

use crate::models::{CampaignConfig, ReplyTarget, ThreadPlan};

/// Most posts a week can hold; more would repeat slot times.
pub const MAX_POSTS_PER_WEEK: usize = 7;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A count that must be positive is zero.
    NonPositiveLimit,
    /// A required reference list is empty.
    EmptyReferenceData,
    /// A numeric field is outside its allowed range.
    OutOfRange,
    /// A thread names a persona not in the campaign.
    UnknownPersona,
    /// A thread targets a subreddit not in the campaign.
    UnknownSubreddit,
    /// A comment replies to a comment that does not come before it.
    InvalidReplyTarget,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a campaign configuration.
///
/// Checks:
/// 1. `posts_per_week` in 1..=[`MAX_POSTS_PER_WEEK`], `candidate_multiplier` positive
/// 2. At least one persona and one keyword
/// 3. No duplicate persona, keyword or subreddit IDs
/// 4. Keyword priority in 1..=10
/// 5. `min_quality_score` in 0..=100
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_campaign(config: &CampaignConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.posts_per_week == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveLimit,
            "postsPerWeek must be greater than 0",
        ));
    }
    if config.posts_per_week > MAX_POSTS_PER_WEEK {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!(
                "postsPerWeek {} exceeds {MAX_POSTS_PER_WEEK}",
                config.posts_per_week
            ),
        ));
    }
    if config.candidate_multiplier == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveLimit,
            "candidateMultiplier must be greater than 0",
        ));
    }

    if config.personas.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyReferenceData,
            "Campaign has no personas",
        ));
    }
    if config.keywords.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyReferenceData,
            "Campaign has no keywords",
        ));
    }

    check_unique(config.personas.iter().map(|p| p.id.as_str()), "persona ID", &mut errors);
    check_unique(config.keywords.iter().map(|k| k.id.as_str()), "keyword ID", &mut errors);
    check_unique(config.subreddits.iter().map(|s| s.name.as_str()), "subreddit", &mut errors);

    for keyword in &config.keywords {
        if !(1..=10u8).contains(&keyword.priority_score) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!(
                    "Keyword '{}' priority {} outside 1..=10",
                    keyword.id, keyword.priority_score
                ),
            ));
        }
    }

    if !(0.0..=100.0).contains(&config.min_quality_score) {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!("minQualityScore {} outside 0..=100", config.min_quality_score),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates generated threads against their campaign.
///
/// Checks:
/// 1. No duplicate thread IDs
/// 2. No duplicate comment IDs within a thread
/// 3. Every reply targets an earlier comment of the same thread
/// 4. OP and commenters are campaign personas
/// 5. The subreddit is a campaign subreddit
/// 6. Engagement and impact in 0..=100, subtlety in 0..=1
/// 7. Topic embeddings contain only finite values
pub fn validate_threads(threads: &[ThreadPlan], config: &CampaignConfig) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique(threads.iter().map(|t| t.id.as_str()), "thread ID", &mut errors);
    for thread in threads {
        validate_thread(thread, config, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a single thread, appending problems to `errors`.
pub fn validate_thread(thread: &ThreadPlan, config: &CampaignConfig, errors: &mut Vec<ValidationError>) {
    if config.subreddit(thread.subreddit()).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnknownSubreddit,
            format!(
                "Thread '{}' targets unknown subreddit '{}'",
                thread.id,
                thread.subreddit()
            ),
        ));
    }

    for persona in thread.persona_ids() {
        if config.persona(persona).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownPersona,
                format!("Thread '{}' uses unknown persona '{}'", thread.id, persona),
            ));
        }
    }

    check_range(
        thread.estimated_engagement,
        100.0,
        || format!("Thread '{}' estimated engagement", thread.id),
        errors,
    );
    check_range(
        thread.post.potential_impact,
        100.0,
        || format!("Thread '{}' potential impact", thread.id),
        errors,
    );

    if let Some(embedding) = &thread.post.topic_embedding {
        if embedding.iter().any(|v| !v.is_finite()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!("Thread '{}' topic embedding has non-finite values", thread.id),
            ));
        }
    }

    let mut earlier: HashSet<&str> = HashSet::new();
    for comment in &thread.comments {
        if let ReplyTarget::Comment(target) = &comment.reply_to {
            if !earlier.contains(target.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReplyTarget,
                    format!(
                        "Comment '{}' in thread '{}' replies to '{}', which does not precede it",
                        comment.id, thread.id, target
                    ),
                ));
            }
        }
        if !earlier.insert(comment.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate comment ID in thread '{}': {}", thread.id, comment.id),
            ));
        }
        check_range(
            comment.subtlety_score,
            1.0,
            || format!("Comment '{}' subtlety", comment.id),
            errors,
        );
    }
}

fn check_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    what: &str,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {what}: {id}"),
            ));
        }
    }
}

fn check_range(
    value: f64,
    max: f64,
    label: impl FnOnce() -> String,
    errors: &mut Vec<ValidationError>,
) {
    if !(0.0..=max).contains(&value) {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!("{} {value} outside 0..={max}", label()),
        ));
    }
}
