//! Task form input and field-level validation.
//!
//! # Responsibility
//! - Accept raw text input from presentation code.
//! - Parse string identifiers and dates once, at this boundary.
//!
//! # Invariants
//! - A form only converts into a `TaskDraft` when every required field is
//!   present and parseable.
//! - Due dates are normalised to UTC instants. Date-only input means local
//!   midnight in the caller's offset, and edit forms render the due date as
//!   a calendar day in that same offset.
//! - Resubmitting an edit form with an unchanged due day keeps the stored
//!   instant, time of day included.

use crate::model::subject::SubjectId;
use crate::clock::local_day;
use crate::model::task::{Priority, Task, TaskDraft, TaskStatus};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Form field that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Subject,
    DueDate,
    /// Subject name in subject forms.
    Name,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subject => "subject",
            Self::DueDate => "dueDate",
            Self::Name => "name",
        }
    }
}

/// Field-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<FormField, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: FormField, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.fields
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.as_str())?;
            first = false;
        }
        Ok(())
    }
}

/// Raw task form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// Selected subject id as submitted; empty means nothing selected.
    pub subject: String,
    /// `yyyy-MM-dd` or RFC 3339; empty means nothing selected.
    pub due_date: String,
    pub priority: Priority,
    pub status: TaskStatus,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            subject: String::new(),
            due_date: String::new(),
            priority: Priority::Medium,
            status: TaskStatus::NotStarted,
        }
    }
}

impl TaskForm {
    pub fn new(
        title: impl Into<String>,
        subject: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subject: subject.into(),
            due_date: due_date.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
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

    /// Pre-fills an edit form from a stored task.
    ///
    /// The due date is rendered as its calendar day in `offset`.
    pub fn from_task(task: &Task, offset: &FixedOffset) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            subject: task.subject.map(|id| id.to_string()).unwrap_or_default(),
            due_date: local_day(task.due_date, offset)
                .format(DATE_INPUT_FORMAT)
                .to_string(),
            priority: task.priority,
            status: task.status,
        }
    }

    /// Validates required fields and builds a normalised draft.
    ///
    /// Date-only due dates resolve to midnight in `offset`.
    ///
    /// # Errors
    /// Returns every failing field at once.
    pub fn validate(&self, offset: &FixedOffset) -> Result<TaskDraft, FormErrors> {
        let mut errors = FormErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.insert(FormField::Title, "Title is required");
        }

        let subject = match parse_subject(&self.subject) {
            Ok(id) => Some(id),
            Err(message) => {
                errors.insert(FormField::Subject, message);
                None
            }
        };

        let due_date = if self.due_date.trim().is_empty() {
            errors.insert(FormField::DueDate, "Due date is required");
            None
        } else {
            let parsed = parse_due_date(&self.due_date, offset);
            if parsed.is_none() {
                errors.insert(FormField::DueDate, "Due date is invalid");
            }
            parsed
        };

        match (subject, due_date) {
            (Some(subject), Some(due_date)) if errors.is_empty() => {
                let description = self.description.trim();
                let mut draft = TaskDraft::new(title, Some(subject), due_date)
                    .with_priority(self.priority)
                    .with_status(self.status);
                if !description.is_empty() {
                    draft = draft.with_description(description);
                }
                Ok(draft)
            }
            _ => Err(errors),
        }
    }

    /// Validates an edit of `existing`.
    ///
    /// A date-only due date naming the same calendar day `existing` falls on
    /// in `offset` keeps the stored instant.
    ///
    /// # Errors
    /// Same as [`TaskForm::validate`].
    pub fn validate_edit(
        &self,
        existing: &Task,
        offset: &FixedOffset,
    ) -> Result<TaskDraft, FormErrors> {
        let mut draft = self.validate(offset)?;
        if parse_date_only(&self.due_date) == Some(local_day(existing.due_date, offset)) {
            draft.due_date = existing.due_date;
        }
        Ok(draft)
    }
}

fn parse_subject(input: &str) -> Result<SubjectId, &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Subject is required");
    }
    match trimmed.parse::<SubjectId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err("Subject is invalid"),
    }
}

fn parse_date_only(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_INPUT_FORMAT).ok()
}

/// Parses a submitted due date into its canonical UTC instant.
///
/// Accepts `yyyy-MM-dd` (midnight in `offset`) or an RFC 3339 timestamp,
/// which carries its own offset.
pub fn parse_due_date(input: &str, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    if let Some(date) = parse_date_only(input) {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return offset
            .from_local_datetime(&midnight)
            .single()
            .map(|local| local.with_timezone(&Utc));
    }
    DateTime::parse_from_rfc3339(input.trim())
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}
