//! Core use-case services.
//!
//! # Responsibility
//! - Mediate create/update/complete/delete requests against stores.
//! - Keep a private cached view in sync with confirmed store results.
//! - Report every outcome to the notification sink.
//!
//! # Invariants
//! - The cached view only changes after a successful store call.
//! - Form validation failures never reach a store.

use crate::model::{EntityId, EntityKind};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod form;
pub mod subject_catalog;
pub mod task_service;

pub use form::{parse_due_date, FormErrors, FormField, TaskForm};
pub use subject_catalog::SubjectCatalog;
pub use task_service::{DeleteOutcome, ServiceContext, TaskService};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Typed failure returned by service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The operation referenced a nonexistent id.
    NotFound { kind: EntityKind, id: EntityId },
    /// Required input is missing or malformed; no I/O was performed.
    Validation(FormErrors),
    /// The store rejected the operation for any other reason.
    StoreFailure(StoreError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn form_errors(&self) -> Option<&FormErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Validation(errors) => write!(f, "validation failed: {errors}"),
            Self::StoreFailure(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::StoreFailure(other),
        }
    }
}

impl From<FormErrors> for ServiceError {
    fn from(value: FormErrors) -> Self {
        Self::Validation(value)
    }
}
