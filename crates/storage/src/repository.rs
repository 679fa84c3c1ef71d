use async_trait::async_trait;
use coach_core::model::{
    Assignment, AssignmentId, Goal, GoalId, JournalEntry, JournalEntryId, SessionLog,
    SessionLogId, TodoId, TodoItem, UserStats,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),
}

#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Persist or replace a goal together with its milestones.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the goal cannot be stored.
    async fn upsert_goal(&self, goal: &Goal) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_goal(&self, id: GoalId) -> Result<Goal, StorageError>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the to-do cannot be stored.
    async fn upsert_todo(&self, todo: &TodoItem) -> Result<(), StorageError>;

    /// Store a new to-do.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id is taken.
    async fn insert_todo(&self, todo: &TodoItem) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_todo(&self, id: TodoId) -> Result<TodoItem, StorageError>;

    /// All to-dos ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_todos(&self) -> Result<Vec<TodoItem>, StorageError>;

    /// Reserve an id for a new to-do.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn next_todo_id(&self) -> Result<TodoId, StorageError>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the assignment cannot be stored.
    async fn upsert_assignment(&self, assignment: &Assignment) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_assignment(&self, id: AssignmentId) -> Result<Assignment, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_assignments(&self) -> Result<Vec<Assignment>, StorageError>;
}

#[async_trait]
pub trait SessionLogRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be stored.
    async fn upsert_session(&self, log: &SessionLog) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_session(&self, id: SessionLogId) -> Result<SessionLog, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_sessions(&self) -> Result<Vec<SessionLog>, StorageError>;
}

#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Store a new entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id is taken.
    async fn insert_entry(&self, entry: &JournalEntry) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_entries(&self) -> Result<Vec<JournalEntry>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn next_entry_id(&self) -> Result<JournalEntryId, StorageError>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no stats were stored yet.
    async fn get_stats(&self) -> Result<UserStats, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the stats cannot be stored.
    async fn upsert_stats(&self, stats: &UserStats) -> Result<(), StorageError>;
}

#[derive(Default)]
struct Tables {
    goals: BTreeMap<GoalId, Goal>,
    todos: BTreeMap<TodoId, TodoItem>,
    assignments: BTreeMap<AssignmentId, Assignment>,
    sessions: BTreeMap<SessionLogId, SessionLog>,
    journal: BTreeMap<JournalEntryId, JournalEntry>,
    stats: Option<UserStats>,
}

/// In-memory backend holding all dashboard data for the current process.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

fn next_key<K: Copy>(map: &BTreeMap<K, impl Sized>, value: impl Fn(K) -> u64) -> u64 {
    map.keys()
        .next_back()
        .map_or(1, |k| value(*k).saturating_add(1))
}

#[async_trait]
impl GoalRepository for InMemoryRepository {
    async fn upsert_goal(&self, goal: &Goal) -> Result<(), StorageError> {
        self.lock()?.goals.insert(goal.id(), goal.clone());
        Ok(())
    }

    async fn get_goal(&self, id: GoalId) -> Result<Goal, StorageError> {
        self.lock()?
            .goals
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl TodoRepository for InMemoryRepository {
    async fn upsert_todo(&self, todo: &TodoItem) -> Result<(), StorageError> {
        self.lock()?.todos.insert(todo.id, todo.clone());
        Ok(())
    }

    async fn insert_todo(&self, todo: &TodoItem) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.todos.contains_key(&todo.id) {
            return Err(StorageError::Conflict);
        }
        guard.todos.insert(todo.id, todo.clone());
        Ok(())
    }

    async fn get_todo(&self, id: TodoId) -> Result<TodoItem, StorageError> {
        self.lock()?
            .todos
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_todos(&self) -> Result<Vec<TodoItem>, StorageError> {
        Ok(self.lock()?.todos.values().cloned().collect())
    }

    async fn next_todo_id(&self) -> Result<TodoId, StorageError> {
        let guard = self.lock()?;
        Ok(TodoId::new(next_key(&guard.todos, |id| id.value())))
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryRepository {
    async fn upsert_assignment(&self, assignment: &Assignment) -> Result<(), StorageError> {
        self.lock()?
            .assignments
            .insert(assignment.id, assignment.clone());
        Ok(())
    }

    async fn get_assignment(&self, id: AssignmentId) -> Result<Assignment, StorageError> {
        self.lock()?
            .assignments
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_assignments(&self) -> Result<Vec<Assignment>, StorageError> {
        Ok(self.lock()?.assignments.values().cloned().collect())
    }
}

#[async_trait]
impl SessionLogRepository for InMemoryRepository {
    async fn upsert_session(&self, log: &SessionLog) -> Result<(), StorageError> {
        self.lock()?.sessions.insert(log.id, log.clone());
        Ok(())
    }

    async fn get_session(&self, id: SessionLogId) -> Result<SessionLog, StorageError> {
        self.lock()?
            .sessions
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_sessions(&self) -> Result<Vec<SessionLog>, StorageError> {
        Ok(self.lock()?.sessions.values().cloned().collect())
    }
}

#[async_trait]
impl JournalRepository for InMemoryRepository {
    async fn insert_entry(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.journal.contains_key(&entry.id) {
            return Err(StorageError::Conflict);
        }
        guard.journal.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<JournalEntry>, StorageError> {
        Ok(self.lock()?.journal.values().cloned().collect())
    }

    async fn next_entry_id(&self) -> Result<JournalEntryId, StorageError> {
        let guard = self.lock()?;
        Ok(JournalEntryId::new(next_key(&guard.journal, |id| id.value())))
    }
}

#[async_trait]
impl StatsRepository for InMemoryRepository {
    async fn get_stats(&self) -> Result<UserStats, StorageError> {
        self.lock()?.stats.clone().ok_or(StorageError::NotFound)
    }

    async fn upsert_stats(&self, stats: &UserStats) -> Result<(), StorageError> {
        self.lock()?.stats = Some(stats.clone());
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub goals: Arc<dyn GoalRepository>,
    pub todos: Arc<dyn TodoRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
    pub sessions: Arc<dyn SessionLogRepository>,
    pub journal: Arc<dyn JournalRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Share one in-memory repository across every role.
    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        Self {
            goals: Arc::new(repo.clone()),
            todos: Arc::new(repo.clone()),
            assignments: Arc::new(repo.clone()),
            sessions: Arc::new(repo.clone()),
            journal: Arc::new(repo.clone()),
            stats: Arc::new(repo),
        }
    }
}
