mod assignment;
mod calendar;
mod chat;
mod goal;
mod ids;
mod journal;
mod rating;
mod session_log;
pub mod settings;
mod stats;
mod todo;

pub use ids::{
    AchievementId, AssignmentId, GoalId, JournalEntryId, MilestoneId, ParseIdError, SessionLogId,
    TodoId,
};

pub use assignment::{Assignment, AssignmentError, AssignmentKind, AssignmentStatus};
pub use calendar::{CalendarEvent, EventKind, EventStatus};
pub use chat::{ChatMessage, CoachStatus, Sender};
pub use goal::{Difficulty, Goal, GoalDraft, GoalError, GoalUpdate, Milestone, MilestoneDraft};
pub use journal::{JournalDraft, JournalEntry, JournalError, Mood};
pub use rating::{Rating, RatingError};
pub use session_log::{SessionKind, SessionLog};
pub use settings::{ChatSettings, DashboardSettings, DashboardSettingsDraft, SettingsError};
pub use stats::{Achievement, LevelTier, Rarity, UserStats};
pub use todo::{Priority, TodoDraft, TodoError, TodoItem};
