//! Core domain logic for StudyDesk.
//! Tasks, subjects, and the queries and statistics derived from them.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod notify;
pub mod query;
pub mod service;
pub mod stats;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::subject::{Subject, SubjectDraft, SubjectId, SubjectPatch};
pub use model::task::{Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
pub use model::{Entity, EntityId, EntityKind, ValidationError};
pub use notify::{AutoConfirm, ConfirmPrompt, LogNotifier, MemoryNotifier, Notification, Notifier};
pub use query::{Category, CategoryCounts, SubjectFilter, TaskQuery, TaskView};
pub use service::{
    DeleteOutcome, FormErrors, FormField, ServiceContext, ServiceError, ServiceResult, TaskForm,
    TaskService,
};
pub use stats::{CalendarDay, CalendarMonth, SubjectProgress, TaskStats};
pub use store::seed::{SeedData, SeedError, SeededStores};
pub use store::{MemoryStore, Store, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
