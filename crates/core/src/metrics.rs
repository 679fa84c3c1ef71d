//! Progress arithmetic behind the dashboard widgets.
//!
//! Every function here is total: inputs that would divide by zero produce a
//! neutral `0.0` instead of `NaN` or infinity.

use chrono::{DateTime, Utc};
use std::f64::consts::PI;

use crate::model::Milestone;
use crate::time::MILLIS_PER_DAY;

/// Anything carrying an optional 1–5 rating.
pub trait Rated {
    fn rating(&self) -> Option<u8>;
}

/// Share of the current level already earned, in percent.
///
/// Returns `0.0` when both inputs are zero.
///
/// ```
/// # use coach_core::metrics::level_progress_percent;
/// let pct = level_progress_percent(2450, 550);
/// assert!((pct - 81.67).abs() < 0.01);
/// ```
#[must_use]
pub fn level_progress_percent(experience: u32, experience_to_next: u32) -> f64 {
    let total = f64::from(experience) + f64::from(experience_to_next);
    if total == 0.0 {
        return 0.0;
    }
    f64::from(experience) / total * 100.0
}

/// Whole days from `reference` to `target`, rounded up.
///
/// Computed on raw milliseconds, not calendar days: positive is in the
/// future, zero is due today, negative is overdue.
#[must_use]
pub fn days_between(target: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    let millis = target.signed_duration_since(reference).num_milliseconds();
    // ceil(millis / day) for signed values
    -(-millis).div_euclid(MILLIS_PER_DAY)
}

/// Days since `start`, rounded up.
#[must_use]
pub fn days_elapsed(start: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    days_between(reference, start)
}

/// Length of a goal's window in days, rounded up.
#[must_use]
pub fn total_days(start: DateTime<Utc>, target: DateTime<Utc>) -> i64 {
    days_between(target, start)
}

/// How much of the `[start, target]` window has passed, in percent.
///
/// Returns `0.0` for an empty window. Not clamped: before the start it is
/// negative and past the target it exceeds 100.
#[must_use]
pub fn time_elapsed_percent(
    start: DateTime<Utc>,
    target: DateTime<Utc>,
    reference: DateTime<Utc>,
) -> f64 {
    let total = total_days(start, target);
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = days_elapsed(start, reference) as f64 / total as f64;
    ratio * 100.0
}

/// Mean rating, counting unrated items as zero.
///
/// Returns `0.0` for an empty collection.
#[must_use]
pub fn average_rating<T: Rated>(items: &[T]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let sum: u32 = items
        .iter()
        .map(|item| u32::from(item.rating().unwrap_or(0)))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let count = items.len() as f64;
    f64::from(sum) / count
}

/// Completed milestones as a percentage of all milestones.
///
/// Returns `0.0` when there are no milestones.
#[must_use]
pub fn milestone_completion_ratio(milestones: &[Milestone]) -> f64 {
    if milestones.is_empty() {
        return 0.0;
    }
    let completed = milestones.iter().filter(|m| m.is_completed()).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = completed as f64 / milestones.len() as f64;
    ratio * 100.0
}

/// Percentage points still missing, after rounding progress to a whole number.
#[must_use]
pub fn remaining_percent(progress: f64) -> f64 {
    100.0 - progress.round()
}

/// Stroke geometry for a circular progress indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRing {
    pub size: f64,
    pub radius: f64,
    pub circumference: f64,
    pub dash_offset: f64,
}

impl ProgressRing {
    pub const DEFAULT_SIZE: f64 = 120.0;
    pub const DEFAULT_STROKE_WIDTH: f64 = 8.0;

    /// The arc is drawn with `stroke-dasharray = circumference` and the
    /// returned offset hides the unfinished part.
    #[must_use]
    pub fn new(progress: f64, size: f64, stroke_width: f64) -> Self {
        let radius = ((size - stroke_width) / 2.0).max(0.0);
        let circumference = radius * 2.0 * PI;
        let dash_offset = circumference - (progress / 100.0) * circumference;
        Self {
            size,
            radius,
            circumference,
            dash_offset,
        }
    }

    #[must_use]
    pub fn with_defaults(progress: f64) -> Self {
        Self::new(progress, Self::DEFAULT_SIZE, Self::DEFAULT_STROKE_WIDTH)
    }
}
