use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{GoalId, MilestoneId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GoalError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("progress must be a finite percentage in [0, 100], got {provided}")]
    InvalidProgress { provided: f64 },

    #[error("target date is before start date")]
    InvalidTimeRange,

    #[error("milestone {0} already belongs to this goal")]
    DuplicateMilestone(MilestoneId),

    #[error("milestone {0} not found")]
    MilestoneNotFound(MilestoneId),
}

fn validate_progress(progress: f64) -> Result<f64, GoalError> {
    if progress.is_finite() && (0.0..=100.0).contains(&progress) {
        Ok(progress)
    } else {
        Err(GoalError::InvalidProgress { provided: progress })
    }
}

fn validate_title(title: String) -> Result<String, GoalError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(GoalError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

//
// ─── MILESTONE ─────────────────────────────────────────────────────────────────
//

/// Unvalidated milestone input.
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneDraft {
    pub title: String,
    pub description: Option<String>,
    pub progress: f64,
    pub is_completed: bool,
    pub experience_reward: u32,
    pub completed_at: Option<DateTime<Utc>>,
    pub target_date: Option<DateTime<Utc>>,
}

impl MilestoneDraft {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            progress: 0.0,
            is_completed: false,
            experience_reward: 0,
            completed_at: None,
            target_date: None,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn completed(mut self, at: DateTime<Utc>) -> Self {
        self.is_completed = true;
        self.completed_at = Some(at);
        self
    }

    #[must_use]
    pub fn with_target_date(mut self, target: DateTime<Utc>) -> Self {
        self.target_date = Some(target);
        self
    }

    #[must_use]
    pub fn with_reward(mut self, experience_reward: u32) -> Self {
        self.experience_reward = experience_reward;
        self
    }

    /// Validate the draft and attach an id.
    ///
    /// Completion and progress are stored as given; a completed milestone
    /// with progress below 100 is accepted.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::EmptyTitle` or `GoalError::InvalidProgress`.
    pub fn validate(self, id: MilestoneId) -> Result<Milestone, GoalError> {
        Ok(Milestone {
            id,
            title: validate_title(self.title)?,
            description: self.description,
            progress: validate_progress(self.progress)?,
            is_completed: self.is_completed,
            experience_reward: self.experience_reward,
            completed_at: self.completed_at,
            target_date: self.target_date,
        })
    }
}

/// A named sub-goal with its own progress, owned by exactly one `Goal`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    id: MilestoneId,
    title: String,
    description: Option<String>,
    progress: f64,
    is_completed: bool,
    experience_reward: u32,
    completed_at: Option<DateTime<Utc>>,
    target_date: Option<DateTime<Utc>>,
}

impl Milestone {
    #[must_use]
    pub fn id(&self) -> MilestoneId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    #[must_use]
    pub fn experience_reward(&self) -> u32 {
        self.experience_reward
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn target_date(&self) -> Option<DateTime<Utc>> {
        self.target_date
    }

    /// # Errors
    ///
    /// Returns `GoalError::InvalidProgress` if `progress` is outside `[0, 100]`.
    pub fn set_progress(&mut self, progress: f64) -> Result<(), GoalError> {
        self.progress = validate_progress(progress)?;
        Ok(())
    }

    /// Completing a milestone pins its progress to 100.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.is_completed = true;
        self.progress = 100.0;
        self.completed_at = Some(now);
    }

    /// Reopen a completed milestone. Progress is left as is.
    pub fn reopen(&mut self) {
        self.is_completed = false;
        self.completed_at = None;
    }
}

//
// ─── GOAL ──────────────────────────────────────────────────────────────────────
//

/// Unvalidated goal input.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub target_date: DateTime<Utc>,
    pub progress: f64,
    pub category: String,
    pub difficulty: Difficulty,
    pub experience_reward: u32,
    pub milestones: Vec<Milestone>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub coach_notes: String,
}

impl GoalDraft {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        start_date: DateTime<Utc>,
        target_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            start_date,
            target_date,
            progress: 0.0,
            category: String::new(),
            difficulty: Difficulty::Medium,
            experience_reward: 0,
            milestones: Vec::new(),
            is_completed: false,
            completed_at: None,
            coach_notes: String::new(),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn with_milestones(mut self, milestones: Vec<Milestone>) -> Self {
        self.milestones = milestones;
        self
    }

    /// # Errors
    ///
    /// Returns `GoalError` if the title is blank, progress is out of range,
    /// the target precedes the start, or two milestones share an id.
    pub fn validate(self, id: GoalId) -> Result<Goal, GoalError> {
        let title = validate_title(self.title)?;
        let progress = validate_progress(self.progress)?;
        if self.target_date < self.start_date {
            return Err(GoalError::InvalidTimeRange);
        }

        let mut goal = Goal {
            id,
            title,
            description: self.description,
            start_date: self.start_date,
            target_date: self.target_date,
            progress,
            category: self.category,
            difficulty: self.difficulty,
            experience_reward: self.experience_reward,
            milestones: Vec::with_capacity(self.milestones.len()),
            is_completed: self.is_completed,
            completed_at: self.completed_at,
            coach_notes: self.coach_notes,
        };
        for milestone in self.milestones {
            goal.push_milestone(milestone)?;
        }
        Ok(goal)
    }
}

/// Editable goal details. The start date, progress and milestones are
/// changed through their own operations.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalUpdate {
    pub title: String,
    pub description: String,
    pub target_date: DateTime<Utc>,
    pub category: String,
    pub difficulty: Difficulty,
}

/// The student's top-level objective.
///
/// Milestone order is insertion order; the layout engine places them in that
/// sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    id: GoalId,
    title: String,
    description: String,
    start_date: DateTime<Utc>,
    target_date: DateTime<Utc>,
    progress: f64,
    category: String,
    difficulty: Difficulty,
    experience_reward: u32,
    milestones: Vec<Milestone>,
    is_completed: bool,
    completed_at: Option<DateTime<Utc>>,
    coach_notes: String,
}

impl Goal {
    #[must_use]
    pub fn id(&self) -> GoalId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    #[must_use]
    pub fn target_date(&self) -> DateTime<Utc> {
        self.target_date
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn experience_reward(&self) -> u32 {
        self.experience_reward
    }

    #[must_use]
    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn coach_notes(&self) -> &str {
        &self.coach_notes
    }

    #[must_use]
    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.is_completed()).count()
    }

    /// # Errors
    ///
    /// Returns `GoalError::DuplicateMilestone` if the id is already present.
    pub fn push_milestone(&mut self, milestone: Milestone) -> Result<(), GoalError> {
        if self.milestones.iter().any(|m| m.id() == milestone.id()) {
            return Err(GoalError::DuplicateMilestone(milestone.id()));
        }
        self.milestones.push(milestone);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GoalError::MilestoneNotFound` if no milestone has this id.
    pub fn milestone_mut(&mut self, id: MilestoneId) -> Result<&mut Milestone, GoalError> {
        self.milestones
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(GoalError::MilestoneNotFound(id))
    }

    /// Append a new milestone under the next free id.
    ///
    /// The milestone always starts open at progress 0, whatever the draft says.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::EmptyTitle` if the draft title is blank.
    pub fn add_milestone(&mut self, draft: MilestoneDraft) -> Result<MilestoneId, GoalError> {
        let id = MilestoneId::new(
            self.milestones
                .iter()
                .map(|m| m.id().value())
                .max()
                .map_or(1, |max| max.saturating_add(1)),
        );
        let draft = MilestoneDraft {
            progress: 0.0,
            is_completed: false,
            completed_at: None,
            ..draft
        };
        self.push_milestone(draft.validate(id)?)?;
        Ok(id)
    }

    /// Replace the editable details.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::EmptyTitle` or `GoalError::InvalidTimeRange`; the
    /// goal is left unchanged on error.
    pub fn apply_update(&mut self, update: GoalUpdate) -> Result<(), GoalError> {
        let title = validate_title(update.title)?;
        if update.target_date < self.start_date {
            return Err(GoalError::InvalidTimeRange);
        }
        self.title = title;
        self.description = update.description;
        self.target_date = update.target_date;
        self.category = update.category;
        self.difficulty = update.difficulty;
        Ok(())
    }

    /// Coach-set progress.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::InvalidProgress` if `progress` is outside `[0, 100]`.
    pub fn set_progress(&mut self, progress: f64) -> Result<(), GoalError> {
        self.progress = validate_progress(progress)?;
        Ok(())
    }

    pub fn set_coach_notes(&mut self, notes: impl Into<String>) {
        self.coach_notes = notes.into();
    }

    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.is_completed = true;
        self.progress = 100.0;
        self.completed_at = Some(now);
    }
}
