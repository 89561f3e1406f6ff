//! Content planning domain models.
//!
//! Provides the data types for a weekly planning run: campaign reference
//! data, candidate threads, time slots, placements and the resulting
//! calendar.
//!
//! # Ownership
//!
//! | Type | Produced by | Mutated by the planner? |
//! |------|-------------|-------------------------|
//! | `CampaignConfig`, `Keyword`, `Persona`, `Subreddit` | Caller | No |
//! | `PostCandidate`, `ThreadPlan` | Generation collaborator | No |
//! | `PostHistory` | Persistence collaborator | No |
//! | `TimeSlot` | Scheduler (per run) | No |
//! | `ScheduledThread` | Scheduler | No (status changes happen downstream) |
//! | `ContentCalendar` | Calendar builder | No |

mod calendar;
mod campaign;
mod history;
mod schedule;
mod slot;
mod thread;

pub use calendar::{CalendarMetadata, CalendarStatus, ContentCalendar};
pub use campaign::{CampaignConfig, Keyword, Persona, Subreddit};
pub use history::{PostHistory, TopicEmbedding};
pub use schedule::{
    ConstraintCheckResult, HardConstraints, ScheduleStatus, ScheduledThread, SoftConstraints,
};
pub use slot::TimeSlot;
pub use thread::{CommentPlan, ConversationStyle, PostCandidate, ReplyTarget, ThreadPlan};
