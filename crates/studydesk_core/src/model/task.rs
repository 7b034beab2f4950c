//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical assignment record and its enums.
//! - Own the completion-timestamp rules applied on create and update.
//!
//! # Invariants
//! - `id` is assigned once by the store and never patched.
//! - `completed_at.is_some() == (status == TaskStatus::Completed)`.
//! - `title` is non-blank.
//!
//! # See also
//! - `store::memory` for id assignment.

use super::subject::SubjectId;
use super::{Entity, EntityId, EntityKind, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type TaskId = EntityId;

/// Task urgency. Ordered `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unsupported priority `{other}`; expected low|medium|high"
            )),
        }
    }
}

/// Task lifecycle state.
///
/// `NotStarted -> InProgress -> Completed` through edits; the completion
/// toggle moves directly between `Completed` and `NotStarted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }

    /// Returns the status reached by the completion toggle, or `None` when the
    /// toggle does not change anything for this status.
    ///
    /// Unchecking only applies to completed tasks; `InProgress -> NotStarted`
    /// is reserved for explicit edits.
    pub fn after_toggle(self, completed: bool) -> Option<TaskStatus> {
        match (self, completed) {
            (Self::Completed, true) => None,
            (_, true) => Some(Self::Completed),
            (Self::Completed, false) => Some(Self::NotStarted),
            (_, false) => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "unsupported status `{other}`; expected not_started|in_progress|completed"
            )),
        }
    }
}

/// Canonical assignment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Weak reference to a subject; unresolved ids mean "no subject".
    #[serde(default)]
    pub subject: Option<SubjectId>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Due strictly before `now` and not completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now && !self.is_completed()
    }

    /// Case-insensitive substring match on title or description.
    ///
    /// `needle` must already be lowercase; an empty needle matches everything.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(needle))
    }

    fn reconcile_completion(&mut self, now: DateTime<Utc>) {
        match (self.is_completed(), self.completed_at) {
            (true, None) => self.completed_at = Some(now),
            (false, Some(_)) => self.completed_at = None,
            _ => {}
        }
    }
}

/// Creation data for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<SubjectId>,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Creates a draft with default priority `medium` and status `not_started`.
    pub fn new(
        title: impl Into<String>,
        subject: Option<SubjectId>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            subject,
            due_date,
            priority: Priority::default(),
            status: TaskStatus::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Converts the draft into a full-replacement patch for edit flows.
    ///
    /// `completed_at` is left unset so the stored timestamp survives edits
    /// that keep a task completed.
    pub fn into_patch(self) -> TaskPatch {
        TaskPatch {
            title: Some(self.title),
            description: Some(self.description),
            subject: Some(self.subject),
            due_date: Some(self.due_date),
            priority: Some(self.priority),
            status: Some(self.status),
            completed_at: None,
        }
    }
}

/// Partial update for a task. `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub subject: Option<Option<SubjectId>>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    /// Honoured only when consistent with the resulting status.
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    /// Patch produced by the completion toggle.
    pub fn completion(status: TaskStatus, now: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            completed_at: Some(status.is_completed().then_some(now)),
            ..Self::default()
        }
    }

    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Entity for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(
        id: EntityId,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let task = Self {
            id,
            title: draft.title,
            description: draft.description,
            subject: draft.subject,
            due_date: draft.due_date,
            priority: draft.priority,
            status: draft.status,
            created_at: now,
            completed_at: draft.status.is_completed().then_some(now),
        };
        task.validate()?;
        Ok(task)
    }

    fn apply_patch(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(subject) = patch.subject {
            self.subject = subject;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = completed_at;
        }
        self.reconcile_completion(now);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id == 0 {
            return Err(ValidationError::ZeroId(EntityKind::Task));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        match (self.is_completed(), self.completed_at.is_some()) {
            (true, false) => Err(ValidationError::MissingCompletedAt(self.id)),
            (false, true) => Err(ValidationError::UnexpectedCompletedAt(self.id)),
            _ => Ok(()),
        }
    }
}
