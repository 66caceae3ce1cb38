//! Position allocation for newly created tasks

use crate::types::{Position, Status, Task};

/// Position for a task appended after `existing`.
///
/// An empty column starts at `Position::STEP`; otherwise the new task lands one
/// step past the largest existing position.
pub fn next_position<I>(existing: I) -> Position
where
    I: IntoIterator<Item = Position>,
{
    existing
        .into_iter()
        .max()
        .map_or(Position::new(Position::STEP), Position::next)
}

/// Position for a task appended to the `status` column of `tasks`.
///
/// Tasks without a stored position count as position zero.
pub fn next_position_in_column(tasks: &[Task], status: Status) -> Position {
    next_position(
        tasks
            .iter()
            .filter(|t| t.status == status)
            .map(Task::sort_position),
    )
}
