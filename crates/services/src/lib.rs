#![forbid(unsafe_code)]

pub mod assignments;
pub mod calendar;
pub mod chat;
pub mod dashboard;
pub mod error;
pub mod journal;
pub mod progress;
pub mod sessions;
pub mod settings;
pub mod tasks;

pub use coach_core::Clock;

pub use chat::{CannedReplyProvider, ChatService, ReplyProvider, TypingDots};
pub use dashboard::{DashboardOverview, DashboardService, LevelSnapshot};
pub use error::{ChatError, ServiceError, SettingsLoadError};
pub use progress::{
    MarkerState, MilestoneGraphView, MilestoneMarker, ProgressSummary, compute_progress_summary,
};
