use chrono::{DateTime, Utc};
use serde::Serialize;

use coach_core::model::{Priority, TodoItem};
use coach_core::time::start_of_day;

/// Open to-dos worth surfacing today: due today, high priority, or overdue.
///
/// Keeps stored order and returns at most `limit` items.
#[must_use]
pub fn today_tasks(todos: &[TodoItem], now: DateTime<Utc>, limit: usize) -> Vec<&TodoItem> {
    let today = now.date_naive();
    let midnight = start_of_day(today);

    todos
        .iter()
        .filter(|todo| !todo.is_completed)
        .filter(|todo| {
            let due_today = todo.due_date.is_some_and(|due| due.date_naive() == today);
            let overdue = todo.due_date.is_some_and(|due| due < midnight);
            due_today || overdue || todo.priority == Priority::High
        })
        .take(limit)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoFilter {
    #[default]
    All,
    Pending,
    Completed,
    Daily,
}

impl TodoFilter {
    #[must_use]
    pub fn matches(self, todo: &TodoItem) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Pending => !todo.is_completed,
            TodoFilter::Completed => todo.is_completed,
            TodoFilter::Daily => todo.is_daily,
        }
    }

    #[must_use]
    pub fn apply(self, todos: &[TodoItem]) -> Vec<&TodoItem> {
        todos.iter().filter(|todo| self.matches(todo)).collect()
    }
}

/// Header numbers of the to-do manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub daily: usize,
    /// Experience still to be earned from open to-dos.
    pub pending_experience: u32,
}

impl TodoStats {
    #[must_use]
    pub fn compute(todos: &[TodoItem]) -> Self {
        todos.iter().fold(Self::default(), |mut stats, todo| {
            stats.total += 1;
            if todo.is_completed {
                stats.completed += 1;
            } else {
                stats.pending_experience =
                    stats.pending_experience.saturating_add(todo.experience_reward);
            }
            if todo.is_daily {
                stats.daily += 1;
            }
            stats
        })
    }
}
