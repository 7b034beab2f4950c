//! Domain model for tasks and the subjects they are grouped by.
//!
//! # Responsibility
//! - Define canonical entity shapes shared by store, query and service code.
//! - Collapse identifiers to one numeric representation at this boundary.
//!
//! # Invariants
//! - Every entity is identified by a stable, non-zero `EntityId`.
//! - `Task::completed_at` is set iff `Task::status == TaskStatus::Completed`.
//! - `Task::subject` is a lookup key only; it may dangle.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod subject;
pub mod task;

/// Canonical identifier for every store-managed record.
///
/// Assigned by the store as `max(existing) + 1`, so `0` is never valid.
pub type EntityId = u64;

/// Entity family tag used in diagnostics and not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Task,
    Subject,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Subject => "subject",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier `0` is reserved.
    ZeroId(EntityKind),
    /// Two records of the same kind share one identifier.
    DuplicateId { kind: EntityKind, id: EntityId },
    /// Task title is empty after trim.
    BlankTitle,
    /// Subject name is empty after trim.
    BlankSubjectName,
    /// `completed_at` is missing on a completed task.
    MissingCompletedAt(EntityId),
    /// `completed_at` is set on a task that is not completed.
    UnexpectedCompletedAt(EntityId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId(kind) => write!(f, "{kind} id must be non-zero"),
            Self::DuplicateId { kind, id } => write!(f, "duplicate {kind} id: {id}"),
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::BlankSubjectName => write!(f, "subject name must not be blank"),
            Self::MissingCompletedAt(id) => {
                write!(f, "task {id} is completed but has no completedAt")
            }
            Self::UnexpectedCompletedAt(id) => {
                write!(f, "task {id} is not completed but has completedAt")
            }
        }
    }
}

impl Error for ValidationError {}

/// Contract every store-managed record implements.
///
/// Drafts carry creation data without identity; patches carry optional
/// field replacements and never an id, which keeps ids immutable.
pub trait Entity: Clone + Send + Sync + 'static {
    type Draft: Send + 'static;
    type Patch: Send + 'static;

    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    /// Builds a stored record from a draft and a freshly assigned id.
    fn from_draft(
        id: EntityId,
        draft: Self::Draft,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError>;

    /// Merges patch fields over this record.
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    fn validate(&self) -> Result<(), ValidationError>;
}

/// Validates every record and rejects duplicate ids within one family.
pub fn validate_collection<E: Entity>(records: &[E]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        record.validate()?;
        if !seen.insert(record.id()) {
            return Err(ValidationError::DuplicateId {
                kind: E::KIND,
                id: record.id(),
            });
        }
    }
    Ok(())
}
