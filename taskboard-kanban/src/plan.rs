//! Reorder planning for drag-and-drop moves.
//!
//! `plan` is pure: it takes the current task collection and a move, and returns
//! the collection as it should look afterwards plus the position writes needed
//! to persist it. Nothing here touches storage or shared state.
//!
//! Two shapes of move are handled differently:
//!
//! - **Within a column** the column is rebuilt in its new order and every task
//!   in it is renumbered densely to `index * 100`. One write per task.
//! - **Across columns** the moved task takes `to_index * 100` in the destination
//!   column and nothing else changes, so the move costs one write. If that value
//!   does not sort strictly between its new neighbours the destination column is
//!   renumbered instead, writing the moved task and every neighbour whose
//!   position changed. The source column is never renumbered.
//!
//! Renumbered positions are 0-based: the first task in a column gets 0, the
//! second 100, and so on. Appended tasks start at 100 (see `allocator`), so a
//! renumbered column and a freshly filled one differ by one step.

use crate::column::tasks_in_column;
use crate::error::{KanbanError, Result};
use crate::logging::Pretty;
use crate::types::{Position, Status, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A drag-and-drop move of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub task_id: TaskId,
    pub from_status: Status,
    pub to_status: Status,
    pub from_index: usize,
    pub to_index: usize,
}

impl MoveRequest {
    pub fn new(
        task_id: impl Into<TaskId>,
        from: (Status, usize),
        to: (Status, usize),
    ) -> Self {
        Self {
            task_id: task_id.into(),
            from_status: from.0,
            from_index: from.1,
            to_status: to.0,
            to_index: to.1,
        }
    }

    /// Dropped exactly where it was picked up
    pub fn is_in_place(&self) -> bool {
        self.from_status == self.to_status && self.from_index == self.to_index
    }
}

/// New status and position for one stored task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionWrite {
    pub task_id: TaskId,
    pub status: Status,
    pub position: Position,
}

impl PositionWrite {
    fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            status: task.status,
            position: task.sort_position(),
        }
    }
}

/// Result of planning a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderPlan {
    /// The whole collection after the move
    pub tasks: Vec<Task>,
    /// Writes needed to persist the move, one per changed task
    pub writes: Vec<PositionWrite>,
    /// Column that was densely renumbered, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renumbered: Option<Status>,
}

impl ReorderPlan {
    /// A plan that changes nothing
    pub fn identity(tasks: &[Task]) -> Self {
        Self {
            tasks: tasks.to_vec(),
            writes: Vec::new(),
            renumbered: None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Plan a move against `tasks`.
///
/// The moving task's current column and index in `tasks` win over the ones in
/// the request; a mismatch means the caller rendered from stale state and is
/// logged. Destination indexes past the end of a column append.
///
/// # Errors
///
/// `KanbanError::TaskNotFound` if the task is not in `tasks`. Nothing has been
/// changed at that point, so callers can log and ignore it.
pub fn plan(tasks: &[Task], mv: &MoveRequest) -> Result<ReorderPlan> {
    if mv.is_in_place() {
        return Ok(ReorderPlan::identity(tasks));
    }

    let moving = tasks
        .iter()
        .find(|t| t.id == mv.task_id)
        .ok_or_else(|| KanbanError::TaskNotFound {
            id: mv.task_id.to_string(),
        })?;

    if moving.status != mv.from_status {
        warn!(
            task = %mv.task_id,
            requested = %mv.from_status,
            actual = %moving.status,
            "drop source column is stale, using the task's current column"
        );
    }

    let source = tasks_in_column(tasks, moving.status);
    let from_index = source
        .iter()
        .position(|t| t.id == moving.id)
        .unwrap_or_default();
    if from_index != mv.from_index {
        warn!(
            task = %mv.task_id,
            requested = mv.from_index,
            actual = from_index,
            "drop source index is stale, using the task's current index"
        );
    }

    let plan = if moving.status == mv.to_status {
        reorder_within(tasks, source, from_index, mv.to_index)
    } else {
        move_across(tasks, moving, mv.to_status, mv.to_index)
    };

    debug!(
        task = %mv.task_id,
        writes = plan.writes.len(),
        renumbered = ?plan.renumbered,
        "planned reorder: {}",
        Pretty(&plan.writes)
    );

    Ok(plan)
}

fn reorder_within(
    tasks: &[Task],
    mut column: Vec<&Task>,
    from_index: usize,
    to_index: usize,
) -> ReorderPlan {
    let moved = column.remove(from_index);
    let to_index = to_index.min(column.len());
    if to_index == from_index {
        return ReorderPlan::identity(tasks);
    }
    let status = moved.status;
    column.insert(to_index, moved);

    let renumbered = renumber(&column, status);
    let writes = renumbered.iter().map(PositionWrite::for_task).collect();

    ReorderPlan {
        tasks: merge(tasks, renumbered),
        writes,
        renumbered: Some(status),
    }
}

fn move_across(tasks: &[Task], moving: &Task, to_status: Status, to_index: usize) -> ReorderPlan {
    let mut column = tasks_in_column(tasks, to_status);
    let to_index = to_index.min(column.len());
    let target = Position::at_index(to_index);

    let before = to_index.checked_sub(1).and_then(|i| column.get(i));
    let after = column.get(to_index);
    let fits = before.map_or(true, |t| t.sort_position() < target)
        && after.map_or(true, |t| target < t.sort_position());

    if fits {
        let placed = moving.placed(to_status, target);
        let writes = vec![PositionWrite::for_task(&placed)];
        return ReorderPlan {
            tasks: merge(tasks, vec![placed]),
            writes,
            renumbered: None,
        };
    }

    column.insert(to_index, moving);
    let renumbered = renumber(&column, to_status);
    let writes = renumbered
        .iter()
        .zip(&column)
        .filter(|(new, old)| new.id == moving.id || new.position != old.position)
        .map(|(new, _)| PositionWrite::for_task(new))
        .collect();

    ReorderPlan {
        tasks: merge(tasks, renumbered),
        writes,
        renumbered: Some(to_status),
    }
}

/// Dense `index * 100` positions for an ordered column
fn renumber(column: &[&Task], status: Status) -> Vec<Task> {
    column
        .iter()
        .enumerate()
        .map(|(index, task)| task.placed(status, Position::at_index(index)))
        .collect()
}

/// Replace tasks in `tasks` by id, keeping collection order
fn merge(tasks: &[Task], updated: Vec<Task>) -> Vec<Task> {
    let mut updated: HashMap<TaskId, Task> =
        updated.into_iter().map(|t| (t.id.clone(), t)).collect();
    tasks
        .iter()
        .map(|t| updated.remove(&t.id).unwrap_or_else(|| t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::tasks_in_column;
    use crate::types::BoardId;
    use chrono::{Duration, TimeZone, Utc};

    fn task(id: &str, status: Status, position: i64, minute: i64) -> Task {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::minutes(minute);
        Task::new(id, BoardId::from("b1"), status)
            .with_id(id)
            .with_created_at(created)
            .with_position(Position::new(position))
    }

    fn column(plan: &ReorderPlan, status: Status) -> Vec<(String, i64)> {
        tasks_in_column(&plan.tasks, status)
            .into_iter()
            .map(|t| (t.id.to_string(), t.sort_position().value()))
            .collect()
    }

    fn expected(entries: &[(&str, i64)]) -> Vec<(String, i64)> {
        entries.iter().map(|(id, p)| (id.to_string(), *p)).collect()
    }

    fn write_ids(plan: &ReorderPlan) -> Vec<&str> {
        plan.writes.iter().map(|w| w.task_id.as_str()).collect()
    }

    #[test]
    fn test_drop_in_place_is_identity() {
        let tasks = vec![task("a", Status::Todo, 100, 0), task("b", Status::Todo, 200, 1)];
        let mv = MoveRequest::new("a", (Status::Todo, 0), (Status::Todo, 0));

        let plan = plan(&tasks, &mv).unwrap();
        assert_eq!(plan.tasks, tasks);
        assert!(plan.writes.is_empty());
        assert!(plan.is_noop());
    }

    #[test]
    fn test_missing_task_is_planning_error() {
        let tasks = vec![task("a", Status::Todo, 100, 0)];
        let mv = MoveRequest::new("ghost", (Status::Todo, 0), (Status::Done, 0));

        let err = plan(&tasks, &mv).unwrap_err();
        assert!(matches!(err, KanbanError::TaskNotFound { ref id } if id == "ghost"));
    }

    #[test]
    fn test_same_column_dense_renumber() {
        let tasks = vec![
            task("a", Status::Todo, 100, 0),
            task("b", Status::Todo, 200, 1),
            task("c", Status::Todo, 300, 2),
        ];
        let mv = MoveRequest::new("a", (Status::Todo, 0), (Status::Todo, 2));

        let plan = plan(&tasks, &mv).unwrap();
        assert_eq!(
            column(&plan, Status::Todo),
            expected(&[("b", 0), ("c", 100), ("a", 200)])
        );
        assert_eq!(plan.writes.len(), 3);
        assert_eq!(plan.renumbered, Some(Status::Todo));
    }

    #[test]
    fn test_same_column_move_up() {
        let tasks = vec![
            task("a", Status::Done, 100, 0),
            task("b", Status::Done, 200, 1),
            task("c", Status::Done, 300, 2),
            task("x", Status::Todo, 100, 3),
        ];
        let mv = MoveRequest::new("c", (Status::Done, 2), (Status::Done, 0));

        let plan = plan(&tasks, &mv).unwrap();
        let order: Vec<String> = column(&plan, Status::Done).into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, ["c", "a", "b"]);
        assert_eq!(write_ids(&plan), ["c", "a", "b"]);
        assert!(plan.writes.iter().all(|w| w.status == Status::Done));
        // Other columns untouched
        assert_eq!(column(&plan, Status::Todo), expected(&[("x", 100)]));
    }

    #[test]
    fn test_cross_column_without_collision_is_single_write() {
        let tasks = vec![
            task("a", Status::Todo, 100, 0),
            task("b", Status::Todo, 200, 1),
            task("x", Status::InProgress, 100, 2),
        ];
        let mv = MoveRequest::new("a", (Status::Todo, 0), (Status::InProgress, 0));

        let plan = plan(&tasks, &mv).unwrap();
        assert_eq!(
            plan.writes,
            [PositionWrite {
                task_id: TaskId::from("a"),
                status: Status::InProgress,
                position: Position::new(0),
            }]
        );
        assert_eq!(plan.renumbered, None);
        // Source column keeps its old positions
        assert_eq!(column(&plan, Status::Todo), expected(&[("b", 200)]));
        assert_eq!(
            column(&plan, Status::InProgress),
            expected(&[("a", 0), ("x", 100)])
        );
    }

    #[test]
    fn test_cross_column_collision_renumbers_destination() {
        let tasks = vec![
            task("a", Status::Todo, 100, 0),
            task("b", Status::Todo, 200, 1),
            task("c", Status::Done, 100, 2),
        ];
        let mv = MoveRequest::new("a", (Status::Todo, 0), (Status::Done, 1));

        let plan = plan(&tasks, &mv).unwrap();
        assert_eq!(
            column(&plan, Status::Done),
            expected(&[("c", 0), ("a", 100)])
        );
        assert_eq!(write_ids(&plan), ["c", "a"]);
        assert_eq!(plan.renumbered, Some(Status::Done));
        assert_eq!(column(&plan, Status::Todo), expected(&[("b", 200)]));
    }

    #[test]
    fn test_cross_column_renumber_skips_unchanged_neighbours() {
        let tasks = vec![
            task("m", Status::Todo, 100, 0),
            task("p", Status::Done, 0, 1),
            task("q", Status::Done, 100, 2),
            task("r", Status::Done, 300, 3),
        ];
        // index 1 -> 100, which equals q's position
        let mv = MoveRequest::new("m", (Status::Todo, 0), (Status::Done, 1));

        let plan = plan(&tasks, &mv).unwrap();
        assert_eq!(
            column(&plan, Status::Done),
            expected(&[
                ("p", 0),
                ("m", 100),
                ("q", 200),
                ("r", 300)
            ])
        );
        // p and r already sat on their dense slots
        assert_eq!(write_ids(&plan), ["m", "q"]);
    }

    #[test]
    fn test_cross_column_to_empty_column() {
        let tasks = vec![task("a", Status::Todo, 100, 0)];
        let mv = MoveRequest::new("a", (Status::Todo, 0), (Status::Done, 4));

        let plan = plan(&tasks, &mv).unwrap();
        assert_eq!(plan.writes.len(), 1);
        assert_eq!(plan.writes[0].position, Position::new(0));
        assert_eq!(plan.tasks[0].status, Status::Done);
    }

    #[test]
    fn test_stale_source_is_corrected() {
        let tasks = vec![
            task("a", Status::Todo, 100, 0),
            task("b", Status::Todo, 200, 1),
        ];
        // Request claims b sits at index 0 of in_progress
        let mv = MoveRequest::new("b", (Status::InProgress, 0), (Status::Todo, 0));

        let plan = plan(&tasks, &mv).unwrap();
        let order: Vec<String> = column(&plan, Status::Todo).into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, ["b", "a"]);
    }

    #[test]
    fn test_same_column_past_end_appends() {
        let tasks = vec![
            task("a", Status::Todo, 100, 0),
            task("b", Status::Todo, 200, 1),
        ];
        let mv = MoveRequest::new("a", (Status::Todo, 0), (Status::Todo, 9));

        let plan = plan(&tasks, &mv).unwrap();
        assert_eq!(
            column(&plan, Status::Todo),
            expected(&[("b", 0), ("a", 100)])
        );
    }

    #[test]
    fn test_collection_order_is_preserved() {
        let tasks = vec![
            task("c", Status::Done, 100, 0),
            task("a", Status::Todo, 100, 1),
            task("b", Status::Todo, 200, 2),
        ];
        let mv = MoveRequest::new("b", (Status::Todo, 1), (Status::Todo, 0));

        let plan = plan(&tasks, &mv).unwrap();
        let ids: Vec<&str> = plan.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }
}
