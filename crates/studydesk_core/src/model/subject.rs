//! Subject domain model.
//!
//! Subjects group tasks for filtering and progress display. Tasks refer to
//! them by id only; deleting a subject never touches its tasks.

use super::{Entity, EntityId, EntityKind, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type SubjectId = EntityId;

/// Course or topic a task belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    /// Display token, usually a hex color.
    #[serde(default)]
    pub color: String,
    /// Display token naming an icon.
    #[serde(default)]
    pub icon: String,
}

/// Creation data for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubjectDraft {
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl SubjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// Partial update for a subject. `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl SubjectPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl Entity for Subject {
    type Draft = SubjectDraft;
    type Patch = SubjectPatch;

    const KIND: EntityKind = EntityKind::Subject;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(
        id: EntityId,
        draft: SubjectDraft,
        _now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let subject = Self {
            id,
            name: draft.name,
            color: draft.color,
            icon: draft.icon,
        };
        subject.validate()?;
        Ok(subject)
    }

    fn apply_patch(&mut self, patch: SubjectPatch, _now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id == 0 {
            return Err(ValidationError::ZeroId(EntityKind::Subject));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankSubjectName);
        }
        Ok(())
    }
}
