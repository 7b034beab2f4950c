//! Deterministic task ordering.

use crate::model::task::Task;
use std::cmp::Ordering;

/// Total order used by every task list.
///
/// Incomplete tasks first; then earlier due date; then higher priority.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.is_completed()
        .cmp(&b.is_completed())
        .then_with(|| a.due_date.cmp(&b.due_date))
        .then_with(|| b.priority.cmp(&a.priority))
}

/// Sorts in place with [`compare_tasks`]; equal tasks keep their input order.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}
