//! Store layer contracts and the in-memory implementation.
//!
//! # Responsibility
//! - Define the asynchronous CRUD contract shared by every backing store.
//! - Assign identities and own the canonical entity collection.
//!
//! # Invariants
//! - Reads return copies; callers never alias stored records.
//! - Ids are assigned as `max(existing) + 1` (or `1` when empty) and are
//!   never changed by updates.
//! - Writes re-validate entity invariants before they are committed.
//! - Semantic errors (`NotFound`) are reported separately from backend
//!   failures.

use crate::model::{Entity, EntityId, EntityKind, ValidationError};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod memory;
pub mod seed;

pub use memory::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for entity persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No entity of `kind` has this id.
    NotFound { kind: EntityKind, id: EntityId },
    /// The write would break an entity invariant.
    Invalid(ValidationError),
    /// The backend rejected the call for any other reason.
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::NotFound { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Asynchronous CRUD contract for one entity family.
///
/// Implementations may live in-process or behind a network hop; callers only
/// rely on each call resolving or failing exactly once.
#[async_trait]
pub trait Store<E: Entity>: Send + Sync {
    /// Returns a copy of every stored entity in insertion order.
    async fn get_all(&self) -> StoreResult<Vec<E>>;

    /// Returns a copy of one entity, or `NotFound`.
    async fn get_by_id(&self, id: EntityId) -> StoreResult<E>;

    /// Stores a new entity under a freshly assigned id and returns it.
    async fn create(&self, draft: E::Draft) -> StoreResult<E>;

    /// Merges `patch` over the stored entity and returns the result.
    async fn update(&self, id: EntityId, patch: E::Patch) -> StoreResult<E>;

    /// Removes one entity. Returns the backend's success flag.
    async fn delete(&self, id: EntityId) -> StoreResult<bool>;
}

#[async_trait]
impl<E, S> Store<E> for Arc<S>
where
    E: Entity,
    S: Store<E> + ?Sized,
{
    async fn get_all(&self) -> StoreResult<Vec<E>> {
        (**self).get_all().await
    }

    async fn get_by_id(&self, id: EntityId) -> StoreResult<E> {
        (**self).get_by_id(id).await
    }

    async fn create(&self, draft: E::Draft) -> StoreResult<E> {
        (**self).create(draft).await
    }

    async fn update(&self, id: EntityId, patch: E::Patch) -> StoreResult<E> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: EntityId) -> StoreResult<bool> {
        (**self).delete(id).await
    }
}
