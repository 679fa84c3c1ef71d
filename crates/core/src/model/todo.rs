use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::TodoId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TodoError {
    #[error("to-do title cannot be empty")]
    EmptyTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Experience granted for a newly created to-do of this priority.
    #[must_use]
    pub fn experience_reward(self) -> u32 {
        match self {
            Priority::High => 50,
            Priority::Medium => 30,
            Priority::Low => 20,
        }
    }
}

/// Unvalidated to-do input from the add form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub category: String,
    pub estimated_minutes: Option<u32>,
    pub is_daily: bool,
    pub recurring_days: Vec<Weekday>,
}

impl TodoDraft {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            priority: Priority::Medium,
            category: String::new(),
            estimated_minutes: Some(30),
            is_daily: false,
            recurring_days: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    #[must_use]
    pub fn daily(mut self, recurring_days: Vec<Weekday>) -> Self {
        self.is_daily = true;
        self.recurring_days = recurring_days;
        self
    }

    /// Validate into an open to-do whose reward follows its priority.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::EmptyTitle` if the title is blank.
    pub fn validate(self, id: TodoId) -> Result<TodoItem, TodoError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }
        let mut recurring_days = self.recurring_days;
        recurring_days.sort_by_key(Weekday::num_days_from_sunday);
        recurring_days.dedup();

        Ok(TodoItem {
            id,
            title: title.to_owned(),
            description: self
                .description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            due_date: self.due_date,
            priority: self.priority,
            is_completed: false,
            completed_at: None,
            experience_reward: self.priority.experience_reward(),
            category: self.category,
            estimated_minutes: self.estimated_minutes,
            is_daily: self.is_daily,
            recurring_days,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub experience_reward: u32,
    pub category: String,
    pub estimated_minutes: Option<u32>,
    pub is_daily: bool,
    /// Days a daily to-do repeats on, Sunday first.
    pub recurring_days: Vec<Weekday>,
}

impl TodoItem {
    /// Flip completion, stamping or clearing `completed_at`.
    pub fn toggle_completed(&mut self, now: DateTime<Utc>) {
        if self.is_completed {
            self.is_completed = false;
            self.completed_at = None;
        } else {
            self.is_completed = true;
            self.completed_at = Some(now);
        }
    }

    /// Replace the editable fields from `draft`, keeping id and completion.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::EmptyTitle` if the title is blank; the to-do is
    /// left unchanged on error.
    pub fn edit(&mut self, draft: TodoDraft) -> Result<(), TodoError> {
        let edited = draft.validate(self.id)?;
        *self = TodoItem {
            is_completed: self.is_completed,
            completed_at: self.completed_at,
            ..edited
        };
        Ok(())
    }

    #[must_use]
    pub fn recurs_on(&self, day: Weekday) -> bool {
        self.is_daily && self.recurring_days.contains(&day)
    }
}
