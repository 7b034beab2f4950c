//! Task use-case service (mutation coordinator).
//!
//! # Responsibility
//! - Orchestrate load/toggle/delete/save requests against the task store.
//! - Hold the cached task view consumed by list, count and stats readers.
//! - Report success and failure through the notification sink.
//!
//! # Invariants
//! - The cached view is replaced only with results of successful store
//!   calls; failures leave it at its last known-good state.
//! - Deletes require confirmation; a declined prompt performs no I/O.
//! - Form validation happens before any store call.
//! - No retries: every failure is returned to the caller.

use super::form::TaskForm;
use super::subject_catalog::SubjectCatalog;
use super::{ServiceError, ServiceResult};
use crate::clock::Clock;
use crate::model::subject::Subject;
use crate::model::task::{Task, TaskId, TaskPatch, TaskStatus};
use crate::notify::{ConfirmPrompt, Notification, Notifier};
use crate::query::{self, CategoryCounts, TaskQuery, TaskView};
use crate::stats::{self, CalendarDay, CalendarMonth, SubjectProgress, TaskStats};
use crate::store::{Store, StoreError};
use chrono::{DateTime, FixedOffset};
use log::{error, info, warn};
use std::sync::Arc;

const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this task?";
const MSG_COMPLETED: &str = "Task completed!";
const MSG_REOPENED: &str = "Task marked as incomplete";
const MSG_TOGGLE_FAILED: &str = "Failed to update task";
const MSG_DELETED: &str = "Task deleted successfully";
const MSG_DELETE_FAILED: &str = "Failed to delete task";
const MSG_CREATED: &str = "Task created successfully!";
const MSG_UPDATED: &str = "Task updated successfully!";
const MSG_SAVE_FAILED: &str = "Failed to save task";
const MSG_LOAD_FAILED: &str = "Failed to load tasks";

/// External collaborators shared by services.
#[derive(Clone)]
pub struct ServiceContext {
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,
    pub prompt: Arc<dyn ConfirmPrompt>,
}

impl ServiceContext {
    pub fn new(
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        prompt: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        Self {
            clock,
            notifier,
            prompt,
        }
    }
}

/// Result of a confirmed-or-declined delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation prompt.
    Cancelled,
}

/// Task service facade over task and subject stores.
pub struct TaskService<T: Store<Task>, S: Store<Subject>> {
    store: T,
    catalog: SubjectCatalog<S>,
    context: ServiceContext,
    cached: Vec<Task>,
}

impl<T: Store<Task>, S: Store<Subject>> TaskService<T, S> {
    /// Creates a service with empty caches; call [`TaskService::load`] next.
    pub fn new(tasks: T, subjects: S, context: ServiceContext) -> Self {
        Self {
            store: tasks,
            catalog: SubjectCatalog::new(subjects, context.clone()),
            context,
            cached: Vec::new(),
        }
    }

    /// Loads tasks and subjects concurrently and replaces both caches.
    ///
    /// Either read failing leaves both caches untouched.
    pub async fn load(&mut self) -> ServiceResult<()> {
        let (tasks, subjects) = tokio::join!(self.store.get_all(), self.catalog.fetch_all());
        match (tasks, subjects) {
            (Ok(tasks), Ok(subjects)) => {
                info!(
                    "event=task_load module=service status=ok tasks={} subjects={}",
                    tasks.len(),
                    subjects.len()
                );
                self.cached = tasks;
                self.catalog.replace_cache(subjects);
                Ok(())
            }
            (Err(err), _) | (_, Err(err)) => {
                Err(self.fail("task_load", None, MSG_LOAD_FAILED, err))
            }
        }
    }

    /// Cached task collection in store order.
    pub fn tasks(&self) -> &[Task] {
        &self.cached
    }

    pub fn subjects(&self) -> &[Subject] {
        self.catalog.subjects()
    }

    pub fn catalog(&self) -> &SubjectCatalog<S> {
        &self.catalog
    }

    /// Subject mutations; the task cache is unaffected by them.
    pub fn catalog_mut(&mut self) -> &mut SubjectCatalog<S> {
        &mut self.catalog
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.context.clock.now()
    }

    /// Filtered and sorted tasks from the cached view.
    pub fn list_tasks(&self, query: &TaskQuery) -> Vec<Task> {
        query::list_tasks(&self.cached, self.subjects(), query, &self.now())
    }

    /// Filtered, sorted and annotated tasks from the cached view.
    pub fn list_views(&self, query: &TaskQuery) -> Vec<TaskView> {
        let now = self.now();
        let tasks = query::list_tasks(&self.cached, self.subjects(), query, &now);
        query::annotate(&tasks, self.subjects(), &now)
    }

    pub fn list_counts(&self, query: &TaskQuery) -> CategoryCounts {
        query::list_counts(&self.cached, self.subjects(), query, &self.now())
    }

    pub fn stats(&self) -> TaskStats {
        stats::compute_stats(&self.cached, self.context.clock.now_utc())
    }

    pub fn subject_progress(&self) -> Vec<(&Subject, SubjectProgress)> {
        stats::subject_progress_report(self.subjects(), &self.cached)
    }

    pub fn calendar(&self, month: CalendarMonth) -> Vec<CalendarDay> {
        stats::month_heatmap(&self.cached, month, &self.now())
    }

    /// Sets or clears completion for one task.
    ///
    /// Reads the current task from the store first. When the toggle does not
    /// change the status (already completed, or unchecking a task that is not
    /// completed) no update is issued and the stored task is returned.
    pub async fn toggle_complete(&mut self, task_id: TaskId, completed: bool) -> ServiceResult<Task> {
        let current = match self.store.get_by_id(task_id).await {
            Ok(task) => task,
            Err(err) => return Err(self.fail("task_toggle", Some(task_id), MSG_TOGGLE_FAILED, err)),
        };

        let Some(status) = current.status.after_toggle(completed) else {
            info!(
                "event=task_toggle module=service status=noop task_id={task_id} task_status={}",
                current.status
            );
            self.upsert_cached(current.clone());
            return Ok(current);
        };

        let patch = TaskPatch::completion(status, self.context.clock.now_utc());
        match self.store.update(task_id, patch).await {
            Ok(updated) => {
                info!(
                    "event=task_toggle module=service status=ok task_id={task_id} task_status={}",
                    updated.status
                );
                self.upsert_cached(updated.clone());
                let message = if status == TaskStatus::Completed {
                    MSG_COMPLETED
                } else {
                    MSG_REOPENED
                };
                self.context.notifier.notify(Notification::success(message));
                Ok(updated)
            }
            Err(err) => Err(self.fail("task_toggle", Some(task_id), MSG_TOGGLE_FAILED, err)),
        }
    }

    /// Deletes one task after user confirmation.
    pub async fn delete_task(&mut self, task_id: TaskId) -> ServiceResult<DeleteOutcome> {
        if !self.context.prompt.confirm(DELETE_CONFIRMATION) {
            info!("event=task_delete module=service status=cancelled task_id={task_id}");
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = match self.store.delete(task_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(StoreError::Unavailable(format!(
                "store reported unsuccessful delete of task {task_id}"
            ))),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                info!("event=task_delete module=service status=ok task_id={task_id}");
                self.cached.retain(|task| task.id != task_id);
                self.context.notifier.notify(Notification::success(MSG_DELETED));
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => Err(self.fail("task_delete", Some(task_id), MSG_DELETE_FAILED, err)),
        }
    }

    /// Validates a form, then updates `editing` or creates a new task.
    ///
    /// Date-only due dates are read in the clock's offset. Editing a cached
    /// task without changing its due day keeps the stored due instant.
    ///
    /// # Errors
    /// - `ServiceError::Validation` with every failing field; no store call
    ///   is made and no notification is sent.
    /// - `ServiceError::NotFound` when `editing` names a missing task.
    /// - `ServiceError::StoreFailure` for any other store rejection.
    pub async fn create_or_update_task(
        &mut self,
        form: &TaskForm,
        editing: Option<TaskId>,
    ) -> ServiceResult<Task> {
        let offset = *self.now().offset();
        let existing = editing.and_then(|task_id| self.cached.iter().find(|task| task.id == task_id));
        let validated = match existing {
            Some(task) => form.validate_edit(task, &offset),
            None => form.validate(&offset),
        };
        let draft = validated.map_err(|errors| {
            info!(
                "event=task_save module=service status=invalid fields={}",
                errors.len()
            );
            ServiceError::Validation(errors)
        })?;

        let (result, success_message) = match editing {
            Some(task_id) => (
                self.store.update(task_id, draft.into_patch()).await,
                MSG_UPDATED,
            ),
            None => (self.store.create(draft).await, MSG_CREATED),
        };

        match result {
            Ok(task) => {
                info!(
                    "event=task_save module=service status=ok task_id={} mode={}",
                    task.id,
                    if editing.is_some() { "update" } else { "create" }
                );
                self.upsert_cached(task.clone());
                self.context
                    .notifier
                    .notify(Notification::success(success_message));
                Ok(task)
            }
            Err(err) => Err(self.fail("task_save", editing, MSG_SAVE_FAILED, err)),
        }
    }

    /// Pre-filled edit form for a cached task, rendered in the clock's offset.
    pub fn edit_form(&self, task_id: TaskId) -> Option<TaskForm> {
        let offset = *self.now().offset();
        self.cached
            .iter()
            .find(|task| task.id == task_id)
            .map(|task| TaskForm::from_task(task, &offset))
    }

    fn upsert_cached(&mut self, task: Task) {
        match self.cached.iter_mut().find(|cached| cached.id == task.id) {
            Some(slot) => *slot = task,
            None => self.cached.push(task),
        }
    }

    fn fail(
        &self,
        event: &str,
        task_id: Option<TaskId>,
        message: &str,
        err: StoreError,
    ) -> ServiceError {
        if err.is_not_found() {
            warn!(
                "event={event} module=service status=error task_id={} error_code=not_found error={err}",
                display_id(task_id)
            );
        } else {
            error!(
                "event={event} module=service status=error task_id={} error_code=store_failure error={err}",
                display_id(task_id)
            );
        }
        self.context.notifier.notify(Notification::error(message));
        err.into()
    }
}

fn display_id(id: Option<TaskId>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string())
}
