//! Soft constraint scores. Each returns a value in [0, 1], higher = better.

use std::collections::HashSet;

use super::{cosine_similarity, title_overlap, ConstraintContext};
use crate::models::{PostHistory, ScheduledThread, ThreadPlan};

/// Most recent history embeddings considered for topic diversity.
pub const HISTORY_EMBEDDING_LIMIT: usize = 10;

/// Average per-persona usage at which the distribution score reaches 0.
pub const PERSONA_USAGE_SATURATION: f64 = 10.0;

/// Usage counted for a comment, relative to 1.0 for an authored post.
pub const COMMENT_EXPOSURE_WEIGHT: f64 = 0.5;

const URGENCY_WEIGHT: f64 = 0.6;
const NOVELTY_WEIGHT: f64 = 0.4;
const NEUTRAL_COVERAGE: f64 = 0.5;

/// Topic diversity: `1 - max similarity` to anything already planned.
///
/// With an embedding, compares by cosine against every scheduled embedding
/// and the [`HISTORY_EMBEDDING_LIMIT`] most recent history embeddings.
/// Without one, falls back to title word overlap against scheduled threads
/// only. Nothing to compare against → 1.0.
pub fn score_topic_diversity(
    thread: &ThreadPlan,
    schedule: &[ScheduledThread],
    history: &[PostHistory],
) -> f64 {
    let max_similarity = match thread.post.topic_embedding.as_deref() {
        Some(embedding) => {
            let mut recent: Vec<&PostHistory> = history
                .iter()
                .filter(|h| h.topic_embedding.is_some())
                .collect();
            recent.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));

            let scheduled = schedule
                .iter()
                .filter_map(|e| e.thread.post.topic_embedding.as_deref());
            let historical = recent
                .into_iter()
                .take(HISTORY_EMBEDDING_LIMIT)
                .filter_map(|h| h.topic_embedding.as_deref());

            scheduled
                .chain(historical)
                .map(|other| cosine_similarity(embedding, other))
                .reduce(f64::max)
        }
        None => schedule
            .iter()
            .map(|e| title_overlap(&thread.post.title, &e.thread.post.title))
            .reduce(f64::max),
    };

    match max_similarity {
        Some(similarity) => (1.0 - similarity).clamp(0.0, 1.0),
        None => 1.0,
    }
}

/// Persona distribution: penalizes threads built on over-used personas.
///
/// For each distinct persona in the thread, usage = prior usage + 1 per
/// scheduled post it authored + [`COMMENT_EXPOSURE_WEIGHT`] per scheduled
/// comment. Score = `max(0, 1 - avg_usage / PERSONA_USAGE_SATURATION)`.
pub fn score_persona_distribution(thread: &ThreadPlan, ctx: &ConstraintContext<'_>) -> f64 {
    let personas = thread.persona_ids();
    if personas.is_empty() {
        return 1.0;
    }

    let total_usage: f64 = personas
        .iter()
        .map(|&persona| ctx.prior_usage(persona) + scheduled_exposure(persona, ctx.schedule))
        .sum();

    let avg_usage = total_usage / personas.len() as f64;
    (1.0 - avg_usage / PERSONA_USAGE_SATURATION).max(0.0)
}

fn scheduled_exposure(persona: &str, schedule: &[ScheduledThread]) -> f64 {
    schedule
        .iter()
        .map(|entry| {
            let authored = if entry.thread.op_persona_id() == persona {
                1.0
            } else {
                0.0
            };
            let commented = entry
                .thread
                .comments
                .iter()
                .filter(|c| c.persona_id == persona)
                .count() as f64;
            authored + commented * COMMENT_EXPOSURE_WEIGHT
        })
        .sum()
}

/// Keyword coverage: favours urgent keywords not yet used this week.
///
/// `avg_urgency * 0.6 + novelty * 0.4`, where novelty is the fraction of the
/// thread's keywords absent from the in-progress schedule. A thread with no
/// keywords scores a neutral 0.5.
pub fn score_keyword_coverage(thread: &ThreadPlan, ctx: &ConstraintContext<'_>) -> f64 {
    let keywords = &thread.post.target_keywords;
    if keywords.is_empty() {
        return NEUTRAL_COVERAGE;
    }

    let used_this_week: HashSet<&str> = ctx
        .schedule
        .iter()
        .flat_map(|e| e.thread.post.target_keywords.iter().map(String::as_str))
        .collect();

    let count = keywords.len() as f64;
    let avg_urgency = keywords.iter().map(|k| ctx.urgency(k)).sum::<f64>() / count;
    let novel = keywords
        .iter()
        .filter(|k| !used_this_week.contains(k.as_str()))
        .count() as f64;

    avg_urgency * URGENCY_WEIGHT + (novel / count) * NOVELTY_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, placed, slot, thread};
    use crate::models::CommentPlan;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    fn random_embedding(rng: &mut SmallRng) -> Vec<f32> {
        let len = rng.random_range(0..=4);
        (0..len)
            .map(|_| match rng.random_range(0..10) {
                0 => 0.0,
                1 => f32::NAN,
                2 => f32::INFINITY,
                3 => f32::NEG_INFINITY,
                _ => rng.random_range(-5.0..5.0),
            })
            .collect()
    }

    fn with_embedding(mut t: ThreadPlan, e: Vec<f32>) -> ThreadPlan {
        t.post.topic_embedding = Some(e);
        t
    }

    fn with_keywords(mut t: ThreadPlan, ks: &[&str]) -> ThreadPlan {
        t.post.target_keywords = ks.iter().map(|k| k.to_string()).collect();
        t
    }

    #[test]
    fn test_diversity_nothing_to_compare() {
        let t = with_embedding(thread("t1", "r/a", "alice", "bob"), vec![1.0, 0.0]);
        assert!((score_topic_diversity(&t, &[], &[]) - 1.0).abs() < 1e-10);

        let no_emb = thread("t2", "r/a", "alice", "bob");
        assert!((score_topic_diversity(&no_emb, &[], &[]) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_diversity_by_embedding() {
        let existing = placed(
            with_embedding(thread("t1", "r/a", "alice", "bob"), vec![1.0, 0.0]),
            slot(7, 9),
        );
        let same = with_embedding(thread("t2", "r/b", "carol", "dave"), vec![2.0, 0.0]);
        let orthogonal = with_embedding(thread("t3", "r/b", "carol", "dave"), vec![0.0, 1.0]);

        let schedule = [existing];
        assert!(score_topic_diversity(&same, &schedule, &[]).abs() < 1e-10);
        assert!((score_topic_diversity(&orthogonal, &schedule, &[]) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_diversity_clamped_for_opposite_vectors() {
        let existing = placed(
            with_embedding(thread("t1", "r/a", "alice", "bob"), vec![1.0, 0.0]),
            slot(7, 9),
        );
        let opposite = with_embedding(thread("t2", "r/b", "carol", "dave"), vec![-1.0, 0.0]);
        assert!((score_topic_diversity(&opposite, &[existing], &[]) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_diversity_uses_ten_most_recent_history_embeddings() {
        let t = with_embedding(thread("t1", "r/a", "alice", "bob"), vec![1.0, 0.0]);

        // Oldest entry is identical; ten newer entries are orthogonal.
        let mut history = vec![PostHistory::new("r/x", at(1, 0)).with_embedding(vec![1.0, 0.0])];
        for hour in 0..10 {
            history.push(PostHistory::new("r/x", at(2, hour)).with_embedding(vec![0.0, 1.0]));
        }
        assert!((score_topic_diversity(&t, &[], &history) - 1.0).abs() < 1e-10);

        // Make one recent entry identical → similarity 1 → diversity 0
        history[3].topic_embedding = Some(vec![1.0, 0.0]);
        assert!(score_topic_diversity(&t, &[], &history).abs() < 1e-10);
    }

    #[test]
    fn test_diversity_title_fallback_ignores_history() {
        let mut a = thread("t1", "r/a", "alice", "bob");
        a.post.title = "best ai slide tool".into();
        let mut b = thread("t2", "r/b", "carol", "dave");
        b.post.title = "best ai slide tool".into();

        let history = vec![PostHistory::new("r/x", at(2, 0)).with_embedding(vec![1.0])];
        assert!((score_topic_diversity(&b, &[], &history) - 1.0).abs() < 1e-10);

        let schedule = [placed(a, slot(7, 9))];
        assert!(score_topic_diversity(&b, &schedule, &history).abs() < 1e-10);
    }

    #[test]
    fn test_diversity_non_finite_embedding() {
        let existing = placed(
            with_embedding(thread("t1", "r/a", "alice", "bob"), vec![1.0, 0.0]),
            slot(7, 9),
        );
        let t = with_embedding(thread("t2", "r/b", "carol", "dave"), vec![f32::NAN, 1.0]);
        let d = score_topic_diversity(&t, &[existing], &[]);
        assert!((d - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_random_diversity_stays_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);

        for i in 0..200 {
            let mut candidate = thread(&format!("c{i}"), "r/a", "alice", "bob");
            if rng.random_bool(0.8) {
                candidate.post.topic_embedding = Some(random_embedding(&mut rng));
            }

            let schedule: Vec<ScheduledThread> = (0..rng.random_range(0..4))
                .map(|j| {
                    let mut t = thread(&format!("s{i}-{j}"), "r/b", "carol", "dave");
                    if rng.random_bool(0.7) {
                        t.post.topic_embedding = Some(random_embedding(&mut rng));
                    }
                    placed(t, slot(7, 9))
                })
                .collect();
            let history: Vec<PostHistory> = (0..rng.random_range(0..15))
                .map(|h| {
                    let entry = PostHistory::new("r/x", at(1 + (h % 5) as u32, h as u32));
                    if rng.random_bool(0.7) {
                        entry.with_embedding(random_embedding(&mut rng))
                    } else {
                        entry
                    }
                })
                .collect();

            let d = score_topic_diversity(&candidate, &schedule, &history);
            assert!((0.0..=1.0).contains(&d), "diversity {d} out of bounds");

            let comparable = match candidate.post.topic_embedding {
                Some(_) => {
                    schedule.iter().any(|e| e.thread.post.topic_embedding.is_some())
                        || history.iter().any(|h| h.topic_embedding.is_some())
                }
                None => !schedule.is_empty(),
            };
            if !comparable {
                assert_eq!(d, 1.0);
            }
        }
    }

    #[test]
    fn test_persona_distribution_prior_usage() {
        let mut usage = HashMap::new();
        usage.insert("alice".to_string(), 4.0);
        usage.insert("bob".to_string(), 2.0);
        let ctx = ConstraintContext::new(3).with_persona_usage(&usage);

        // avg = (4 + 2) / 2 = 3 → 1 - 0.3
        let t = thread("t1", "r/a", "alice", "bob");
        assert!((score_persona_distribution(&t, &ctx) - 0.7).abs() < 1e-10);
    }

    #[test]
    fn test_persona_distribution_schedule_exposure() {
        // Scheduled entry: OP bob, comments alice + carol + alice → alice 2 * 0.5 = 1.0
        let entry = ThreadPlan::new("e1", crate::models::PostCandidate::new("p", "r/a", "bob"))
            .with_comment(CommentPlan::new("c1", "alice"))
            .with_comment(CommentPlan::new("c2", "carol"))
            .with_comment(CommentPlan::new("c3", "alice"));
        let schedule = [placed(entry, slot(7, 9))];
        let ctx = ConstraintContext::new(3).with_schedule(&schedule);

        // Candidate touches alice (1.0) and bob (OP once → 1.0) → avg 1.0
        let t = thread("t1", "r/b", "alice", "bob");
        assert!((score_persona_distribution(&t, &ctx) - 0.9).abs() < 1e-10);
    }

    #[test]
    fn test_persona_distribution_saturates() {
        let mut usage = HashMap::new();
        usage.insert("alice".to_string(), 30.0);
        let ctx = ConstraintContext::new(3).with_persona_usage(&usage);
        let t = thread("t1", "r/a", "alice", "bob");
        assert_eq!(score_persona_distribution(&t, &ctx), 0.0);
    }

    #[test]
    fn test_keyword_coverage_neutral_without_keywords() {
        let t = thread("t1", "r/a", "alice", "bob");
        assert_eq!(score_keyword_coverage(&t, &ConstraintContext::new(3)), 0.5);
    }

    #[test]
    fn test_keyword_coverage_urgency_and_novelty() {
        let mut urgency = HashMap::new();
        urgency.insert("K1".to_string(), 1.0);
        urgency.insert("K2".to_string(), 0.0);

        let used = with_keywords(thread("t0", "r/x", "carol", "dave"), &["K2"]);
        let schedule = [placed(used, slot(7, 9))];
        let ctx = ConstraintContext::new(3)
            .with_schedule(&schedule)
            .with_keyword_urgency(&urgency);

        // avg urgency 0.5, novelty 1/2 → 0.3 + 0.2
        let t = with_keywords(thread("t1", "r/a", "alice", "bob"), &["K1", "K2"]);
        assert!((score_keyword_coverage(&t, &ctx) - 0.5).abs() < 1e-10);

        // all fresh and urgent → 1.0
        let fresh = with_keywords(thread("t2", "r/a", "alice", "bob"), &["K1"]);
        assert!((score_keyword_coverage(&fresh, &ctx) - 1.0).abs() < 1e-10);
    }
}
