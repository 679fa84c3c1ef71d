use chrono::{DateTime, Utc};
use tracing::{debug, info};

use coach_core::Clock;
use coach_core::model::{
    Assignment, AssignmentId, DashboardSettings, Goal, GoalId, GoalUpdate, JournalDraft,
    JournalEntry, LevelTier, MilestoneDraft, MilestoneId, SessionLog, SessionLogId, TodoDraft,
    TodoId, TodoItem,
};
use storage::repository::{Storage, StorageError};

use crate::assignments::{AssignmentCounts, AssignmentFilter};
use crate::calendar::{CalendarMonth, CalendarSources, generate_events};
use crate::error::ServiceError;
use crate::journal::{self, JournalStats};
use crate::progress::{MilestoneGraphView, ProgressSummary, compute_progress_summary};
use crate::sessions::{self, SessionStats};
use crate::tasks::{TodoFilter, TodoStats, today_tasks};

/// Inserts retried with a fresh id when another writer took the id first.
const INSERT_ATTEMPTS: usize = 3;

//
// ─── OVERVIEW ──────────────────────────────────────────────────────────────────
//

/// Level badge numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSnapshot {
    pub level: u32,
    pub tier: LevelTier,
    pub experience: u32,
    pub experience_to_next: u32,
    pub level_progress_percent: f64,
    pub current_streak: u32,
}

/// Data behind the dashboard landing view.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    pub goal_title: String,
    pub progress: ProgressSummary,
    /// `None` until stats have been recorded.
    pub level: Option<LevelSnapshot>,
    pub pending_assignments: usize,
    pub open_todos: usize,
    pub today_tasks: Vec<TodoItem>,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Reads and updates the student's dashboard for one goal.
#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    settings: DashboardSettings,
    goal_id: GoalId,
    storage: Storage,
}

impl DashboardService {
    #[must_use]
    pub fn new(storage: Storage, goal_id: GoalId) -> Self {
        Self {
            clock: Clock::default(),
            settings: DashboardSettings::default(),
            goal_id,
            storage,
        }
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: DashboardSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn goal_id(&self) -> GoalId {
        self.goal_id
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Storage` if the goal cannot be loaded.
    pub async fn goal(&self) -> Result<Goal, ServiceError> {
        Ok(self.storage.goals.get_goal(self.goal_id).await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Storage` if the goal cannot be loaded.
    pub async fn progress_summary(&self) -> Result<ProgressSummary, ServiceError> {
        let goal = self.goal().await?;
        Ok(compute_progress_summary(&goal, self.now()))
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Storage` if any backing record fails to load.
    pub async fn overview(&self) -> Result<DashboardOverview, ServiceError> {
        let now = self.now();
        let goal = self.goal().await?;
        let todos = self.storage.todos.list_todos().await?;
        let assignments = self.storage.assignments.list_assignments().await?;

        let level = match self.storage.stats.get_stats().await {
            Ok(stats) => Some(LevelSnapshot {
                level: stats.level,
                tier: stats.tier(),
                experience: stats.experience,
                experience_to_next: stats.experience_to_next,
                level_progress_percent: stats.level_progress_percent(),
                current_streak: stats.current_streak,
            }),
            Err(StorageError::NotFound) => None,
            Err(err) => return Err(err.into()),
        };

        let today = today_tasks(&todos, now, self.settings.today_task_limit())
            .into_iter()
            .cloned()
            .collect();

        Ok(DashboardOverview {
            goal_title: goal.title().to_owned(),
            progress: compute_progress_summary(&goal, now),
            level,
            pending_assignments: AssignmentFilter::Pending.apply(&assignments).len(),
            open_todos: TodoFilter::Pending.apply(&todos).len(),
            today_tasks: today,
        })
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Storage` if the goal cannot be loaded.
    pub async fn milestone_graph(&self) -> Result<MilestoneGraphView, ServiceError> {
        let goal = self.goal().await?;
        Ok(MilestoneGraphView::build(&goal))
    }

    /// Month view with every dated record placed on its day.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidMonth` for a nonexistent month, or
    /// `ServiceError::Storage` if a record fails to load.
    pub async fn calendar_month(
        &self,
        year: i32,
        month: u32,
        next_session: Option<DateTime<Utc>>,
    ) -> Result<CalendarMonth, ServiceError> {
        let now = self.now();
        let goal = self.goal().await?;
        let sessions = self.storage.sessions.list_sessions().await?;
        let todos = self.storage.todos.list_todos().await?;
        let assignments = self.storage.assignments.list_assignments().await?;

        let events = generate_events(
            CalendarSources {
                goal: &goal,
                sessions: &sessions,
                todos: &todos,
                assignments: &assignments,
                next_session,
            },
            now,
        );
        CalendarMonth::build(&events, year, month, now.date_naive())
    }

    /// Edit the goal's title, description, target date, category and difficulty.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Goal` for a blank title or a target date before
    /// the start, or `ServiceError::Storage` on persistence failure.
    pub async fn update_goal(&self, update: GoalUpdate) -> Result<Goal, ServiceError> {
        let mut goal = self.goal().await?;
        goal.apply_update(update)?;
        self.storage.goals.upsert_goal(&goal).await?;
        info!(goal_id = %self.goal_id, "goal updated");
        Ok(goal)
    }

    /// Append an open milestone at the end of the path.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Goal` for a blank title, or
    /// `ServiceError::Storage` on persistence failure.
    pub async fn add_milestone(&self, draft: MilestoneDraft) -> Result<Goal, ServiceError> {
        let mut goal = self.goal().await?;
        let milestone_id = goal.add_milestone(draft)?;
        self.storage.goals.upsert_goal(&goal).await?;
        info!(%milestone_id, "milestone added");
        Ok(goal)
    }

    /// Complete or reopen a milestone and store the goal.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Goal` if the milestone is not part of the goal,
    /// or `ServiceError::Storage` on persistence failure.
    pub async fn set_milestone_completed(
        &self,
        milestone_id: MilestoneId,
        completed: bool,
    ) -> Result<Goal, ServiceError> {
        let now = self.now();
        let mut goal = self.goal().await?;
        let milestone = goal.milestone_mut(milestone_id)?;
        if completed {
            milestone.mark_completed(now);
        } else {
            milestone.reopen();
        }
        self.storage.goals.upsert_goal(&goal).await?;
        info!(%milestone_id, completed, "milestone updated");
        Ok(goal)
    }

    //
    // ─── TO-DOS ────────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `ServiceError::Storage` on backend failure.
    pub async fn todos(&self, filter: TodoFilter) -> Result<Vec<TodoItem>, ServiceError> {
        let todos = self.storage.todos.list_todos().await?;
        Ok(filter.apply(&todos).into_iter().cloned().collect())
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Storage` on backend failure.
    pub async fn todo_stats(&self) -> Result<TodoStats, ServiceError> {
        let todos = self.storage.todos.list_todos().await?;
        Ok(TodoStats::compute(&todos))
    }

    /// Validate and store a new to-do under the next free id.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Todo` for an invalid draft, or
    /// `ServiceError::Storage` on persistence failure.
    pub async fn add_todo(&self, draft: TodoDraft) -> Result<TodoItem, ServiceError> {
        let mut todo = draft.validate(self.storage.todos.next_todo_id().await?)?;
        let mut attempt = 1;
        loop {
            match self.storage.todos.insert_todo(&todo).await {
                Ok(()) => break,
                Err(StorageError::Conflict) if attempt < INSERT_ATTEMPTS => {
                    debug!(todo_id = %todo.id, "todo id taken, retrying");
                    attempt += 1;
                    todo.id = self.storage.todos.next_todo_id().await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
        info!(todo_id = %todo.id, "todo added");
        Ok(todo)
    }

    /// Replace a to-do's details; completion state is kept.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Todo` for an invalid draft, or
    /// `ServiceError::Storage` if the to-do is missing or cannot be saved.
    pub async fn edit_todo(&self, id: TodoId, draft: TodoDraft) -> Result<TodoItem, ServiceError> {
        let mut todo = self.storage.todos.get_todo(id).await?;
        todo.edit(draft)?;
        self.storage.todos.upsert_todo(&todo).await?;
        info!(todo_id = %id, "todo edited");
        Ok(todo)
    }

    /// Flip a to-do between open and done.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Storage` if the to-do is missing or cannot be saved.
    pub async fn toggle_todo(&self, id: TodoId) -> Result<TodoItem, ServiceError> {
        let mut todo = self.storage.todos.get_todo(id).await?;
        todo.toggle_completed(self.now());
        self.storage.todos.upsert_todo(&todo).await?;
        debug!(todo_id = %id, completed = todo.is_completed, "todo toggled");
        Ok(todo)
    }

    //
    // ─── ASSIGNMENTS ───────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `ServiceError::Storage` on backend failure.
    pub async fn assignments(
        &self,
        filter: AssignmentFilter,
    ) -> Result<Vec<Assignment>, ServiceError> {
        let assignments = self.storage.assignments.list_assignments().await?;
        Ok(filter.apply(&assignments).into_iter().cloned().collect())
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Storage` on backend failure.
    pub async fn assignment_counts(&self) -> Result<AssignmentCounts, ServiceError> {
        let assignments = self.storage.assignments.list_assignments().await?;
        Ok(AssignmentCounts::tally(&assignments, self.now()))
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Assignment` for an empty submission or an
    /// assignment that is no longer pending, or `ServiceError::Storage`.
    pub async fn submit_assignment(
        &self,
        id: AssignmentId,
        submission: &str,
    ) -> Result<Assignment, ServiceError> {
        let mut assignment = self.storage.assignments.get_assignment(id).await?;
        assignment.submit(submission, self.now())?;
        self.storage.assignments.upsert_assignment(&assignment).await?;
        info!(assignment_id = %id, "assignment submitted");
        Ok(assignment)
    }

    //
    // ─── JOURNAL ───────────────────────────────────────────────────────────────
    //

    /// Entries newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Storage` on backend failure.
    pub async fn journal_entries(&self) -> Result<Vec<JournalEntry>, ServiceError> {
        let entries = self.storage.journal.list_entries().await?;
        Ok(journal::newest_first(&entries).into_iter().cloned().collect())
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Storage` on backend failure.
    pub async fn journal_stats(&self) -> Result<JournalStats, ServiceError> {
        let entries = self.storage.journal.list_entries().await?;
        Ok(JournalStats::compute(&entries, self.now()))
    }

    /// Validate and store a journal entry dated now.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Journal` for an invalid draft, or
    /// `ServiceError::Storage` on persistence failure.
    pub async fn add_journal_entry(
        &self,
        draft: JournalDraft,
    ) -> Result<JournalEntry, ServiceError> {
        let mut entry = draft.validate(self.storage.journal.next_entry_id().await?, self.now())?;
        let mut attempt = 1;
        loop {
            match self.storage.journal.insert_entry(&entry).await {
                Ok(()) => break,
                Err(StorageError::Conflict) if attempt < INSERT_ATTEMPTS => {
                    attempt += 1;
                    entry.id = self.storage.journal.next_entry_id().await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
        info!(entry_id = %entry.id, "journal entry added");
        Ok(entry)
    }

    //
    // ─── SESSIONS ──────────────────────────────────────────────────────────────
    //

    /// Session logs newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Storage` on backend failure.
    pub async fn session_logs(&self) -> Result<Vec<SessionLog>, ServiceError> {
        let logs = self.storage.sessions.list_sessions().await?;
        Ok(sessions::newest_first(&logs).into_iter().cloned().collect())
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Storage` on backend failure.
    pub async fn session_stats(&self) -> Result<SessionStats, ServiceError> {
        let logs = self.storage.sessions.list_sessions().await?;
        Ok(SessionStats::compute(&logs))
    }

    /// Store the student's reflection on a session; blank text clears it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Storage` if the session is missing or cannot be saved.
    pub async fn save_reflection(
        &self,
        id: SessionLogId,
        reflection: &str,
    ) -> Result<SessionLog, ServiceError> {
        let mut log = self.storage.sessions.get_session(id).await?;
        log.set_reflection(reflection);
        self.storage.sessions.upsert_session(&log).await?;
        debug!(session_id = %id, has_reflection = log.has_reflection(), "reflection saved");
        Ok(log)
    }
}

impl std::fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService")
            .field("clock", &self.clock)
            .field("settings", &self.settings)
            .field("goal_id", &self.goal_id)
            .finish_non_exhaustive()
    }
}
