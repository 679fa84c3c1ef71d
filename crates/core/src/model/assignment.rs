use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::AssignmentId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssignmentError {
    #[error("submission cannot be empty")]
    EmptySubmission,

    #[error("assignment {id} is {status:?}, only pending assignments accept submissions")]
    NotPending {
        id: AssignmentId,
        status: AssignmentStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentKind {
    Reflection,
    Action,
    Research,
    Practice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    Pending,
    Submitted,
    Reviewed,
    Completed,
}

impl AssignmentStatus {
    /// Reviewed and completed both count as done.
    #[must_use]
    pub fn is_done(self) -> bool {
        matches!(self, AssignmentStatus::Reviewed | AssignmentStatus::Completed)
    }
}

/// Work the coach hands out between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub description: String,
    pub assigned_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub kind: AssignmentKind,
    pub submission: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub coach_feedback: Option<String>,
    pub experience_reward: u32,
    pub status: AssignmentStatus,
}

impl Assignment {
    #[must_use]
    pub fn new(
        id: AssignmentId,
        title: impl Into<String>,
        kind: AssignmentKind,
        assigned_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            assigned_date,
            due_date,
            kind,
            submission: None,
            submitted_at: None,
            coach_feedback: None,
            experience_reward: 0,
            status: AssignmentStatus::Pending,
        }
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    /// Past due and still pending.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now && self.status == AssignmentStatus::Pending
    }

    /// # Errors
    ///
    /// Returns `AssignmentError::EmptySubmission` for blank text and
    /// `AssignmentError::NotPending` if the assignment was already handed in.
    pub fn submit(&mut self, text: &str, now: DateTime<Utc>) -> Result<(), AssignmentError> {
        if self.status != AssignmentStatus::Pending {
            return Err(AssignmentError::NotPending {
                id: self.id,
                status: self.status,
            });
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(AssignmentError::EmptySubmission);
        }
        self.submission = Some(text.to_owned());
        self.submitted_at = Some(now);
        self.status = AssignmentStatus::Submitted;
        Ok(())
    }
}
