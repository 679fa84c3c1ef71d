use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Session,
    Assignment,
    Milestone,
    Goal,
    Todo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    Completed,
    Pending,
    Overdue,
}

impl EventStatus {
    /// Completed wins; otherwise a date in the past is overdue.
    #[must_use]
    pub fn classify(completed: bool, date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if completed {
            EventStatus::Completed
        } else if date < now {
            EventStatus::Overdue
        } else {
            EventStatus::Pending
        }
    }
}

/// A dated entry shown on the calendar, derived from other records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Prefixed with the source kind, e.g. `todo-3`.
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub kind: EventKind,
    pub description: Option<String>,
    pub status: Option<EventStatus>,
}
