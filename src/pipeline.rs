//! Weekly planning pipeline.
//!
//! Wires the collaborators around the scheduling core:
//!
//! ```text
//! validate config → snapshot history → rank candidates → generate threads
//!   → validate threads → quality review → schedule → build calendar
//! ```
//!
//! Generation and review are external collaborators behind the
//! [`ContentGenerator`] and [`QualityReviewer`] traits; history comes from
//! a [`HistoryStore`]. The planner itself performs no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use crate::history::{HistoryStore, PlanningSnapshot};
use crate::models::{
    CampaignConfig, ContentCalendar, ConversationStyle, Persona, PostCandidate, ThreadPlan,
};
use crate::scheduler::{build_calendar, ContentScheduler};
use crate::scoring::{rank_candidates, ThreadScorer};
use crate::validation::{validate_campaign, validate_threads};

/// Produces post candidates and expands them into threads.
pub trait ContentGenerator {
    /// Raw post ideas for the campaign week.
    fn generate_candidates(&self, config: &CampaignConfig) -> Result<Vec<PostCandidate>>;

    /// Expands a candidate into a full conversation in the given style.
    fn generate_thread(
        &self,
        candidate: &PostCandidate,
        config: &CampaignConfig,
        style: ConversationStyle,
    ) -> Result<ThreadPlan>;
}

/// One named check within a quality review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheck {
    pub name: String,
    pub passed: bool,
    /// 0-100.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl QualityCheck {
    pub fn new(name: impl Into<String>, passed: bool, score: f64) -> Self {
        Self {
            name: name.into(),
            passed,
            score,
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// Reviewer verdict for one thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    /// 0-100.
    pub overall_score: f64,
    pub passed: bool,
    pub checks: Vec<QualityCheck>,
}

impl QualityReport {
    pub fn failed_checks(&self) -> impl Iterator<Item = &QualityCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Adversarial review of generated threads.
pub trait QualityReviewer {
    fn evaluate_thread(
        &self,
        thread: &ThreadPlan,
        product_name: &str,
        personas: &[Persona],
    ) -> Result<QualityReport>;
}

/// Plans one campaign week end to end.
#[derive(Debug)]
pub struct WeeklyPlanner<G, R, S> {
    generator: G,
    reviewer: R,
    store: S,
    scorer: ThreadScorer,
}

impl<G, R, S> WeeklyPlanner<G, R, S>
where
    G: ContentGenerator,
    R: QualityReviewer,
    S: HistoryStore,
{
    pub fn new(generator: G, reviewer: R, store: S) -> Self {
        Self {
            generator,
            reviewer,
            store,
            scorer: ThreadScorer::default(),
        }
    }

    /// Replaces the thread scorer used for placement.
    pub fn with_scorer(mut self, scorer: ThreadScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Plans the week starting at `config.week_start`.
    ///
    /// # Errors
    /// - [`PlannerError::InvalidConfig`] if the campaign fails validation.
    /// - [`PlannerError::InvalidInput`] if the generator returns malformed threads.
    /// - [`PlannerError::NoEligibleThreads`] if review leaves nothing to schedule.
    /// - Collaborator errors are propagated unchanged.
    ///
    /// Unfilled slots are not an error; they show in the calendar metadata.
    pub fn plan_week(&self, config: &CampaignConfig, now: DateTime<Utc>) -> Result<ContentCalendar> {
        validate_campaign(config).map_err(|errors| PlannerError::InvalidConfig { errors })?;

        let snapshot = PlanningSnapshot::capture(&self.store, config, now)?;
        let threads = self.generate_threads(config, &snapshot)?;

        validate_threads(&threads, config).map_err(|errors| PlannerError::InvalidInput {
            message: errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        })?;

        let generated = threads.len();
        let eligible = self.review(threads, config)?;
        if eligible.is_empty() {
            return Err(PlannerError::NoEligibleThreads {
                generated,
                rejected: generated,
            });
        }

        let outcome = ContentScheduler::new(snapshot)
            .with_scorer(self.scorer.clone())
            .schedule_with_report(&eligible, config);
        let calendar = build_calendar(&outcome.entries, config, &config.campaign_id);

        info!(
            campaign = %config.campaign_id,
            generated,
            eligible = eligible.len(),
            scheduled = calendar.metadata.scheduled_count,
            violations = calendar.metadata.constraint_violations,
            quality = calendar.metadata.quality_score,
            diversity = calendar.metadata.diversity_score,
            "planned week"
        );
        Ok(calendar)
    }

    /// Expands the top-ranked candidates into threads, rotating styles.
    fn generate_threads(
        &self,
        config: &CampaignConfig,
        snapshot: &PlanningSnapshot,
    ) -> Result<Vec<ThreadPlan>> {
        let candidates = self.generator.generate_candidates(config)?;
        let ranked = rank_candidates(&candidates, &snapshot.scoring_context());
        let budget = config.generation_budget();
        debug!(candidates = candidates.len(), budget, "ranked candidates");

        ranked
            .iter()
            .take(budget)
            .enumerate()
            .map(|(i, scored)| {
                self.generator
                    .generate_thread(&scored.candidate, config, ConversationStyle::rotation(i))
            })
            .collect()
    }

    /// Keeps threads the reviewer passes with at least `min_quality_score`.
    fn review(&self, threads: Vec<ThreadPlan>, config: &CampaignConfig) -> Result<Vec<ThreadPlan>> {
        let mut eligible = Vec::with_capacity(threads.len());
        for thread in threads {
            let report =
                self.reviewer
                    .evaluate_thread(&thread, &config.product_name, &config.personas)?;
            if report.passed && report.overall_score >= config.min_quality_score {
                eligible.push(thread);
            } else {
                debug!(
                    thread_id = %thread.id,
                    score = report.overall_score,
                    failed = report.failed_checks().count(),
                    "thread rejected by review"
                );
            }
        }
        Ok(eligible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, campaign};
    use crate::history::MemoryHistoryStore;
    use crate::models::{CommentPlan, PostHistory};
    use std::cell::RefCell;

    /// One candidate per (subreddit, persona) pair, impact descending.
    #[derive(Default)]
    struct ScriptedGenerator {
        styles: RefCell<Vec<ConversationStyle>>,
        stray_persona: bool,
    }

    impl ContentGenerator for ScriptedGenerator {
        fn generate_candidates(&self, config: &CampaignConfig) -> Result<Vec<PostCandidate>> {
            let mut out = Vec::new();
            for (s, sub) in config.subreddits.iter().enumerate() {
                for (p, persona) in config.personas.iter().enumerate() {
                    let keyword = &config.keywords[(s + p) % config.keywords.len()];
                    out.push(
                        PostCandidate::new(format!("cand-{s}-{p}"), sub.name.clone(), persona.id.clone())
                            .with_title(format!("{} question {s} {p}", sub.name))
                            .with_keyword(keyword.id.clone())
                            .with_impact(90.0 - (s * 10 + p) as f64)
                            .with_generated_at(at(5, 0)),
                    );
                }
            }
            Ok(out)
        }

        fn generate_thread(
            &self,
            candidate: &PostCandidate,
            config: &CampaignConfig,
            style: ConversationStyle,
        ) -> Result<ThreadPlan> {
            self.styles.borrow_mut().push(style);
            let op = config
                .personas
                .iter()
                .position(|p| p.id == candidate.op_persona_id)
                .ok_or_else(|| PlannerError::generation("unknown OP"))?;
            let responder = if self.stray_persona {
                "stranger".to_string()
            } else {
                config.personas[(op + 1) % config.personas.len()].id.clone()
            };
            Ok(ThreadPlan::new(format!("thread-{}", candidate.id), candidate.clone())
                .with_comment(
                    CommentPlan::new(format!("{}-c1", candidate.id), responder)
                        .mentioning_product(0.7),
                )
                .with_style(style)
                .with_engagement(candidate.potential_impact))
        }
    }

    /// Passes threads whose engagement reaches the threshold; score = engagement.
    struct ThresholdReviewer {
        min_engagement: f64,
    }

    impl QualityReviewer for ThresholdReviewer {
        fn evaluate_thread(
            &self,
            thread: &ThreadPlan,
            product_name: &str,
            _personas: &[Persona],
        ) -> Result<QualityReport> {
            let engaging = thread.estimated_engagement >= self.min_engagement;
            let mut engagement =
                QualityCheck::new("engagement", engaging, thread.estimated_engagement);
            if !engaging {
                engagement = engagement.with_feedback("conversation unlikely to draw replies");
            }
            Ok(QualityReport {
                overall_score: thread.estimated_engagement,
                passed: engaging,
                checks: vec![
                    engagement,
                    QualityCheck::new("product_mention", !product_name.is_empty(), 80.0),
                ],
            })
        }
    }

    fn planner(min_engagement: f64) -> WeeklyPlanner<ScriptedGenerator, ThresholdReviewer, MemoryHistoryStore> {
        WeeklyPlanner::new(
            ScriptedGenerator::default(),
            ThresholdReviewer { min_engagement },
            MemoryHistoryStore::new(),
        )
    }

    #[test]
    fn test_plan_week_fills_slots() {
        let config = campaign(3);
        let calendar = planner(0.0).plan_week(&config, at(5, 0)).unwrap();

        assert_eq!(calendar.entry_count(), 3);
        assert_eq!(calendar.metadata.total_slots, 3);
        assert_eq!(calendar.metadata.constraint_violations, 0);
        assert_eq!(calendar.campaign_id, "camp-1");
        assert_eq!(calendar.week_start_date, config.week_start);
        assert!(calendar.metadata.quality_score > 0);
    }

    #[test]
    fn test_generation_budget_and_style_rotation() {
        let config = campaign(3).with_candidate_multiplier(2);
        let planner = planner(0.0);
        planner.plan_week(&config, at(5, 0)).unwrap();

        let styles = planner.generator.styles.borrow();
        assert_eq!(styles.len(), 6);
        assert_eq!(styles[0], ConversationStyle::Question);
        assert_eq!(styles[4], ConversationStyle::Question);
        assert_eq!(styles[5], ConversationStyle::Recommendation);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let err = planner(0.0).plan_week(&campaign(0), at(5, 0)).unwrap_err();
        match err {
            PlannerError::InvalidConfig { errors } => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_all_rejected_is_an_error() {
        let err = planner(101.0).plan_week(&campaign(2), at(5, 0)).unwrap_err();
        assert!(matches!(
            err,
            PlannerError::NoEligibleThreads {
                generated: 4,
                rejected: 4
            }
        ));
    }

    #[test]
    fn test_min_quality_score_gate() {
        // Generated impacts for the top 4 candidates: 90, 89, 88, 87
        let config = campaign(2).with_min_quality_score(88.5);
        let calendar = planner(0.0).plan_week(&config, at(5, 0)).unwrap();
        assert_eq!(calendar.entry_count(), 2);
        assert!(calendar
            .entries
            .iter()
            .all(|e| e.thread.estimated_engagement >= 88.5));
    }

    #[test]
    fn test_report_failed_checks() {
        let reviewer = ThresholdReviewer { min_engagement: 50.0 };
        let thread = ThreadPlan::new("t", PostCandidate::new("p", "r/PowerPoint", "alice"))
            .with_engagement(20.0);
        let report = reviewer.evaluate_thread(&thread, "SlideForge", &[]).unwrap();
        let failed: Vec<&QualityCheck> = report.failed_checks().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].name, "engagement");
        assert!(failed[0].feedback.is_some());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("overallScore").is_some());
    }

    #[test]
    fn test_malformed_threads_rejected() {
        let planner = WeeklyPlanner::new(
            ScriptedGenerator {
                stray_persona: true,
                ..Default::default()
            },
            ThresholdReviewer { min_engagement: 0.0 },
            MemoryHistoryStore::new(),
        );
        let err = planner.plan_week(&campaign(1), at(5, 0)).unwrap_err();
        match err {
            PlannerError::InvalidInput { message } => assert!(message.contains("stranger")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_history_steers_away_from_recent_subreddit() {
        // r/PowerPoint posted yesterday: its candidates lose diversity and
        // the Tuesday slot is inside its cooldown
        let store = MemoryHistoryStore::new().with_post(
            PostHistory::new("r/PowerPoint", at(5, 12))
                .with_persona("alice")
                .with_keyword("K1"),
        );
        let planner = WeeklyPlanner::new(
            ScriptedGenerator::default(),
            ThresholdReviewer { min_engagement: 0.0 },
            store,
        );
        let calendar = planner.plan_week(&campaign(3), at(6, 0)).unwrap();
        let first = &calendar.entries[0];
        assert_ne!(first.subreddit(), "r/PowerPoint");
        assert!(first.constraints_satisfied.passed);
    }
}
