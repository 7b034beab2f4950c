//! Task query engine.
//!
//! # Responsibility
//! - Filter the canonical task collection by search text, subject and
//!   category.
//! - Order results deterministically and annotate them for display.
//! - Count tasks per category for filter badges.
//!
//! # Invariants
//! - All functions are pure over their inputs; "now" is always a parameter.
//! - Filters apply in order: search, subject, category.
//! - Ordering: incomplete before completed, then due date ascending, then
//!   priority descending. Sorting is stable.
//! - A subject filter only matches subjects present in the subject context.

pub mod filter;
pub mod order;
pub mod view;

pub use filter::{
    list_counts, list_tasks, subject_task_counts, Category, CategoryCounts, SubjectFilter,
    TaskQuery,
};
pub use order::{compare_tasks, sort_tasks};
pub use view::{annotate, empty_state, DueLabel, DueTone, EmptyState, TaskView};
