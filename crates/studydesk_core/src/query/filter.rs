//! Task list filters and the filtering pipeline.

use super::order::sort_tasks;
use crate::clock::local_day;
use crate::model::subject::{Subject, SubjectId};
use crate::model::task::{Priority, Task};
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Subject dimension of a task query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubjectFilter {
    #[default]
    All,
    Only(SubjectId),
}

impl FromStr for SubjectFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<SubjectId>()
            .map(Self::Only)
            .map_err(|_| format!("invalid subject filter `{trimmed}`; expected `all` or an id"))
    }
}

/// Closed set of named task-view predicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    #[default]
    All,
    Today,
    Tomorrow,
    Overdue,
    Completed,
    Pending,
    HighPriority,
    MediumPriority,
    LowPriority,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 9] = [
        Category::All,
        Category::Today,
        Category::Tomorrow,
        Category::Overdue,
        Category::Completed,
        Category::Pending,
        Category::HighPriority,
        Category::MediumPriority,
        Category::LowPriority,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::HighPriority => "high",
            Self::MediumPriority => "medium",
            Self::LowPriority => "low",
        }
    }

    /// Human-readable filter button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
            Self::Overdue => "Overdue",
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::HighPriority => "High Priority",
            Self::MediumPriority => "Medium Priority",
            Self::LowPriority => "Low Priority",
        }
    }

    /// Evaluates this predicate for one task.
    ///
    /// Day predicates compare calendar days in `now`'s offset; `Overdue`
    /// compares instants.
    pub fn matches(self, task: &Task, now: &DateTime<FixedOffset>) -> bool {
        let today = now.date_naive();
        match self {
            Self::All => true,
            Self::Today => local_day(task.due_date, now.offset()) == today,
            Self::Tomorrow => today
                .succ_opt()
                .is_some_and(|tomorrow| local_day(task.due_date, now.offset()) == tomorrow),
            Self::Overdue => task.is_overdue(now.with_timezone(&Utc)),
            Self::Completed => task.is_completed(),
            Self::Pending => !task.is_completed(),
            Self::HighPriority => task.priority == Priority::High,
            Self::MediumPriority => task.priority == Priority::Medium,
            Self::LowPriority => task.priority == Priority::Low,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            "overdue" => Ok(Self::Overdue),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "high" | "priority-high" => Ok(Self::HighPriority),
            "medium" | "priority-medium" => Ok(Self::MediumPriority),
            "low" | "priority-low" => Ok(Self::LowPriority),
            other => Err(format!(
                "unsupported category `{other}`; expected all|today|tomorrow|overdue|completed|pending|high|medium|low"
            )),
        }
    }
}

/// Every active filter for one task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Free text matched against title or description; empty matches all.
    pub search: String,
    pub subject: SubjectFilter,
    pub category: Category,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn subject(mut self, subject: SubjectFilter) -> Self {
        self.subject = subject;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }
}

/// Task counts per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: BTreeMap<Category, usize>,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Entries in [`Category::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        self.counts.iter().map(|(category, count)| (*category, *count))
    }
}

/// Returns the tasks matching every active filter, sorted.
pub fn list_tasks(
    tasks: &[Task],
    subjects: &[Subject],
    query: &TaskQuery,
    now: &DateTime<FixedOffset>,
) -> Vec<Task> {
    let mut matched: Vec<Task> = prefiltered(tasks, subjects, query)
        .filter(|task| query.category.matches(task, now))
        .cloned()
        .collect();
    sort_tasks(&mut matched);
    matched
}

/// Counts every category over the search- and subject-filtered tasks.
///
/// The query's own category is ignored so every badge stays meaningful.
pub fn list_counts(
    tasks: &[Task],
    subjects: &[Subject],
    query: &TaskQuery,
    now: &DateTime<FixedOffset>,
) -> CategoryCounts {
    let base: Vec<&Task> = prefiltered(tasks, subjects, query).collect();
    let counts = Category::ALL
        .iter()
        .map(|category| {
            let count = base
                .iter()
                .filter(|task| category.matches(task, now))
                .count();
            (*category, count)
        })
        .collect();
    CategoryCounts { counts }
}

/// Number of tasks per existing subject, ignoring every filter.
pub fn subject_task_counts(tasks: &[Task], subjects: &[Subject]) -> Vec<(SubjectId, usize)> {
    subjects
        .iter()
        .map(|subject| {
            let count = tasks
                .iter()
                .filter(|task| task.subject == Some(subject.id))
                .count();
            (subject.id, count)
        })
        .collect()
}

fn prefiltered<'a>(
    tasks: &'a [Task],
    subjects: &'a [Subject],
    query: &TaskQuery,
) -> impl Iterator<Item = &'a Task> + 'a {
    let needle = query.search.to_lowercase();
    let subject = query.subject;
    tasks
        .iter()
        .filter(move |task| task.matches_search(&needle))
        .filter(move |task| matches_subject(task, subject, subjects))
}

fn matches_subject(task: &Task, filter: SubjectFilter, subjects: &[Subject]) -> bool {
    match filter {
        SubjectFilter::All => true,
        SubjectFilter::Only(id) => {
            task.subject == Some(id) && subjects.iter().any(|subject| subject.id == id)
        }
    }
}
