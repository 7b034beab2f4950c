//! Aggregate statistics over the full task collection.
//!
//! # Responsibility
//! - Compute overall progress, overdue and upcoming counts.
//! - Compute per-subject completion progress.
//! - Build the monthly due-date heat-map (`calendar`).
//!
//! # Invariants
//! - Inputs are never filtered here; callers pass the canonical collection.
//! - Percentages are rounded half up and are `0` for empty inputs.
//! - "This week" is the closed window `[now, now + 7 days]`.

use crate::model::subject::Subject;
use crate::model::task::{Priority, Task};
use chrono::{DateTime, Duration, Utc};

pub mod calendar;

pub use calendar::{month_heatmap, CalendarDay, CalendarMonth, HeatIntensity};

/// Length of the upcoming-work window.
pub const THIS_WEEK_WINDOW_DAYS: i64 = 7;

/// Overall progress figures for the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    /// Whole percent of completed tasks, `0..=100`.
    pub completion_rate: u32,
    pub this_week: usize,
    pub high_priority: usize,
}

/// Completion progress for one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubjectProgress {
    pub completed_count: usize,
    pub total_count: usize,
    /// Whole percent, `0` when the subject has no tasks.
    pub percent: u32,
}

/// Computes overall statistics for `tasks` at instant `now`.
pub fn compute_stats(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let week_end = now + Duration::days(THIS_WEEK_WINDOW_DAYS);
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.is_completed()).count();

    TaskStats {
        total,
        completed,
        pending: total - completed,
        overdue: tasks.iter().filter(|task| task.is_overdue(now)).count(),
        completion_rate: rounded_percent(completed, total),
        this_week: tasks
            .iter()
            .filter(|task| task.due_date >= now && task.due_date <= week_end)
            .count(),
        high_priority: tasks
            .iter()
            .filter(|task| task.priority == Priority::High)
            .count(),
    }
}

/// Computes completion progress of one subject.
pub fn compute_subject_progress(subject: &Subject, tasks: &[Task]) -> SubjectProgress {
    let (completed_count, total_count) = tasks
        .iter()
        .filter(|task| task.subject == Some(subject.id))
        .fold((0, 0), |(done, total), task| {
            (done + usize::from(task.is_completed()), total + 1)
        });

    SubjectProgress {
        completed_count,
        total_count,
        percent: rounded_percent(completed_count, total_count),
    }
}

/// Progress for every subject, in subject order.
pub fn subject_progress_report<'a>(
    subjects: &'a [Subject],
    tasks: &[Task],
) -> Vec<(&'a Subject, SubjectProgress)> {
    subjects
        .iter()
        .map(|subject| (subject, compute_subject_progress(subject, tasks)))
        .collect()
}

/// `round(part / whole * 100)` with halves rounded up; `0` when `whole == 0`.
pub fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part as u128;
    let whole = whole as u128;
    let percent = (part * 200 + whole) / (whole * 2);
    u32::try_from(percent).unwrap_or(u32::MAX)
}
