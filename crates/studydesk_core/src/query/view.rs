//! Display annotations for filtered task lists.

use crate::clock::local_day;
use crate::model::subject::Subject;
use crate::model::task::Task;
use crate::query::filter::TaskQuery;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::fmt::{Display, Formatter};

/// Relative due-date label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    Today,
    Tomorrow,
    /// Any other day, rendered as `MMM dd`.
    On(NaiveDate),
}

impl Display for DueLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Today => f.write_str("Today"),
            Self::Tomorrow => f.write_str("Tomorrow"),
            Self::On(date) => write!(f, "{}", date.format("%b %d")),
        }
    }
}

/// Urgency tone of a due date. Evaluated in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueTone {
    Completed,
    Overdue,
    DueToday,
    Upcoming,
}

/// One task with its resolved subject and due-date annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub task: Task,
    /// `None` when the task has no subject or references a deleted one.
    pub subject: Option<Subject>,
    pub due_label: DueLabel,
    pub due_tone: DueTone,
}

/// What to show when a list comes back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The search term matched nothing.
    NoMatches,
    /// No search is active; the list is simply empty.
    NoTasks,
}

impl EmptyState {
    pub fn title(self) -> &'static str {
        "No tasks found"
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NoMatches => {
                "No tasks match your search criteria. Try adjusting your filters."
            }
            Self::NoTasks => "Create your first task to get started with your academic journey.",
        }
    }
}

/// Picks the empty-list message for the active query.
pub fn empty_state(query: &TaskQuery) -> EmptyState {
    if !query.has_search() {
        EmptyState::NoTasks
    } else {
        EmptyState::NoMatches
    }
}

/// Annotates tasks in their given order.
pub fn annotate(tasks: &[Task], subjects: &[Subject], now: &DateTime<FixedOffset>) -> Vec<TaskView> {
    tasks
        .iter()
        .map(|task| TaskView {
            subject: task
                .subject
                .and_then(|id| subjects.iter().find(|subject| subject.id == id))
                .cloned(),
            due_label: due_label(task.due_date, now),
            due_tone: due_tone(task, now),
            task: task.clone(),
        })
        .collect()
}

fn due_label(due: DateTime<Utc>, now: &DateTime<FixedOffset>) -> DueLabel {
    let day = local_day(due, now.offset());
    let today = now.date_naive();
    if day == today {
        DueLabel::Today
    } else if today.succ_opt() == Some(day) {
        DueLabel::Tomorrow
    } else {
        DueLabel::On(day)
    }
}

fn due_tone(task: &Task, now: &DateTime<FixedOffset>) -> DueTone {
    if task.is_completed() {
        DueTone::Completed
    } else if task.is_overdue(now.with_timezone(&Utc)) {
        DueTone::Overdue
    } else if local_day(task.due_date, now.offset()) == now.date_naive() {
        DueTone::DueToday
    } else {
        DueTone::Upcoming
    }
}
