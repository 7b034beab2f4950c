//! Subject catalog use-case service.
//!
//! # Invariants
//! - Subject names are non-blank after trim.
//! - Deleting a subject never touches tasks; their references dangle.

use super::form::{FormErrors, FormField};
use super::task_service::{DeleteOutcome, ServiceContext};
use super::{ServiceError, ServiceResult};
use crate::model::subject::{Subject, SubjectDraft, SubjectId, SubjectPatch};
use crate::notify::Notification;
use crate::store::{Store, StoreError, StoreResult};
use log::{info, warn};

const SUBJECT_DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this subject? Its tasks will keep no subject.";

/// Subject CRUD facade with a cached view.
pub struct SubjectCatalog<S: Store<Subject>> {
    store: S,
    context: ServiceContext,
    cached: Vec<Subject>,
}

impl<S: Store<Subject>> SubjectCatalog<S> {
    pub fn new(store: S, context: ServiceContext) -> Self {
        Self {
            store,
            context,
            cached: Vec::new(),
        }
    }

    /// Refreshes the cached view from the store.
    pub async fn load(&mut self) -> ServiceResult<()> {
        match self.fetch_all().await {
            Ok(subjects) => {
                self.replace_cache(subjects);
                Ok(())
            }
            Err(err) => Err(self.fail("subject_load", None, "Failed to load subjects", err)),
        }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.cached
    }

    pub fn get(&self, id: SubjectId) -> Option<&Subject> {
        self.cached.iter().find(|subject| subject.id == id)
    }

    pub async fn create(&mut self, draft: SubjectDraft) -> ServiceResult<Subject> {
        ensure_name(&draft.name)?;
        let draft = SubjectDraft {
            name: draft.name.trim().to_string(),
            ..draft
        };
        match self.store.create(draft).await {
            Ok(subject) => {
                info!(
                    "event=subject_create module=service status=ok subject_id={}",
                    subject.id
                );
                self.cached.push(subject.clone());
                self.context
                    .notifier
                    .notify(Notification::success("Subject created successfully!"));
                Ok(subject)
            }
            Err(err) => Err(self.fail("subject_create", None, "Failed to save subject", err)),
        }
    }

    pub async fn rename(&mut self, id: SubjectId, name: impl Into<String>) -> ServiceResult<Subject> {
        let name = name.into();
        ensure_name(&name)?;
        match self
            .store
            .update(id, SubjectPatch::rename(name.trim()))
            .await
        {
            Ok(subject) => {
                info!("event=subject_update module=service status=ok subject_id={id}");
                if let Some(slot) = self.cached.iter_mut().find(|cached| cached.id == id) {
                    *slot = subject.clone();
                } else {
                    self.cached.push(subject.clone());
                }
                self.context
                    .notifier
                    .notify(Notification::success("Subject updated successfully!"));
                Ok(subject)
            }
            Err(err) => Err(self.fail("subject_update", Some(id), "Failed to save subject", err)),
        }
    }

    /// Deletes a subject after user confirmation.
    pub async fn delete(&mut self, id: SubjectId) -> ServiceResult<DeleteOutcome> {
        if !self.context.prompt.confirm(SUBJECT_DELETE_CONFIRMATION) {
            info!("event=subject_delete module=service status=cancelled subject_id={id}");
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = match self.store.delete(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(StoreError::Unavailable(format!(
                "store reported unsuccessful delete of subject {id}"
            ))),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                info!("event=subject_delete module=service status=ok subject_id={id}");
                self.cached.retain(|subject| subject.id != id);
                self.context
                    .notifier
                    .notify(Notification::success("Subject deleted successfully"));
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => Err(self.fail("subject_delete", Some(id), "Failed to delete subject", err)),
        }
    }

    pub(crate) async fn fetch_all(&self) -> StoreResult<Vec<Subject>> {
        self.store.get_all().await
    }

    pub(crate) fn replace_cache(&mut self, subjects: Vec<Subject>) {
        self.cached = subjects;
    }

    fn fail(
        &self,
        event: &str,
        id: Option<SubjectId>,
        message: &str,
        err: StoreError,
    ) -> ServiceError {
        warn!(
            "event={event} module=service status=error subject_id={} error={err}",
            id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
        );
        self.context.notifier.notify(Notification::error(message));
        err.into()
    }
}

fn ensure_name(name: &str) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(FormErrors::single(FormField::Name, "Name is required").into());
    }
    Ok(())
}
