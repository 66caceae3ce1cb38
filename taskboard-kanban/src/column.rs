//! Column partitioning: the ordered tasks of one status.
//!
//! Views borrow the authoritative task slice and sort on every call, so they
//! can never disagree with the collection they were built from.

use crate::types::{Status, Task, TaskId};
use std::cmp::Ordering;

/// Display order within a column: position, then creation time, then id.
pub fn column_order(a: &Task, b: &Task) -> Ordering {
    a.sort_position()
        .cmp(&b.sort_position())
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// The tasks of `status`, in display order
pub fn tasks_in_column(tasks: &[Task], status: Status) -> Vec<&Task> {
    let mut column: Vec<&Task> = tasks.iter().filter(|t| t.status == status).collect();
    column.sort_by(|a, b| column_order(a, b));
    column
}

/// All three columns, in `Status::ALL` order
pub fn partition(tasks: &[Task]) -> [(Status, Vec<&Task>); 3] {
    Status::ALL.map(|status| (status, tasks_in_column(tasks, status)))
}

/// Reorders an owned collection column by column (todo, in progress, done).
pub fn sort_by_column(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| a.status.cmp(&b.status).then_with(|| column_order(a, b)));
    tasks
}

/// A borrowed, restartable view of one column
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    tasks: &'a [Task],
    status: Status,
}

impl<'a> ColumnView<'a> {
    pub fn new(tasks: &'a [Task], status: Status) -> Self {
        Self { tasks, status }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Ordered tasks, recomputed from the underlying slice
    pub fn iter(&self) -> std::vec::IntoIter<&'a Task> {
        tasks_in_column(self.tasks, self.status).into_iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.iter().filter(|t| t.status == self.status).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Display index of a task in this column
    pub fn index_of(&self, id: &TaskId) -> Option<usize> {
        self.iter().position(|t| &t.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&'a Task> {
        self.iter().nth(index)
    }
}

impl<'a> IntoIterator for ColumnView<'a> {
    type Item = &'a Task;
    type IntoIter = std::vec::IntoIter<&'a Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
