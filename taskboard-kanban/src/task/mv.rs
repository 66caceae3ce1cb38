//! MoveTask command

use crate::context::KanbanContext;
use crate::drop::DropEvent;
use crate::error::{KanbanError, Result};
use crate::processor::{failed_logged, logged};
use crate::session::DropOutcome;
use crate::types::BoardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Apply a drag-and-drop gesture to a board
#[operation(verb = "move", noun = "task", description = "Move a task to a new column or index")]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveTask {
    pub board_id: BoardId,
    pub event: DropEvent,
}

impl MoveTask {
    pub fn new(board_id: impl Into<BoardId>, event: DropEvent) -> Self {
        Self {
            board_id: board_id.into(),
            event,
        }
    }

    async fn run(&self, ctx: &KanbanContext) -> Result<DropOutcome> {
        ctx.require_access(&self.board_id).await?;
        let mut session = ctx.session(&self.board_id).await?;
        session.handle_drop(&self.event).await
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for MoveTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let started = Instant::now();
        match self.run(ctx).await {
            Ok(outcome @ DropOutcome::Moved { .. }) => {
                logged(self, started, serde_json::to_value(&outcome).map_err(Into::into))
            }
            Ok(outcome) => {
                ExecutionResult::from_result(serde_json::to_value(&outcome).map_err(Into::into))
            }
            // Some rows may already hold the new positions
            Err(error @ KanbanError::Persistence { .. }) => failed_logged(self, started, error),
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drop::DropLocation;
    use crate::store::{ActivityLog, BoardStore, MemoryStore, TaskStore};
    use crate::task::AddTask;
    use crate::types::{Position, Status, TaskId, UserId};
    use crate::KanbanOperationProcessor;
    use std::sync::Arc;
    use taskboard_operations::OperationProcessor;

    async fn setup() -> (Arc<MemoryStore>, KanbanContext, BoardId, Vec<TaskId>) {
        let store = Arc::new(MemoryStore::new());
        let board = store
            .create_board("Test", &UserId::from("alice"))
            .await
            .unwrap();
        let ctx = KanbanContext::new(store.clone(), "alice");

        let mut ids = Vec::new();
        for title in ["A", "B", "C"] {
            let task = AddTask::new(board.id.clone(), title)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
            ids.push(TaskId::from(task["id"].as_str().unwrap()));
        }
        (store, ctx, board.id, ids)
    }

    fn drag(id: &TaskId, from: (Status, usize), to: (Status, usize)) -> DropEvent {
        DropEvent::new(
            id.clone(),
            DropLocation::in_column(from.0, from.1),
            DropLocation::in_column(to.0, to.1),
        )
    }

    #[tokio::test]
    async fn test_move_within_column() {
        let (store, ctx, board_id, ids) = setup().await;

        let result = MoveTask::new(board_id.clone(), drag(&ids[0], (Status::Todo, 0), (Status::Todo, 2)))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["outcome"], "moved");
        assert_eq!(result["writes"].as_array().unwrap().len(), 3);

        let tasks = store.fetch_tasks(&board_id).await.unwrap();
        let order: Vec<(&str, i64)> = tasks
            .iter()
            .map(|t| (t.title.as_str(), t.sort_position().value()))
            .collect();
        assert_eq!(order, [("B", 0), ("C", 100), ("A", 200)]);
    }

    #[tokio::test]
    async fn test_move_across_columns_is_logged() {
        let (store, ctx, board_id, ids) = setup().await;
        let processor = KanbanOperationProcessor::new();

        processor
            .process(
                &MoveTask::new(board_id, drag(&ids[1], (Status::Todo, 1), (Status::Done, 0))),
                &ctx,
            )
            .await
            .unwrap();

        let moved = store.get_task(&ids[1]).await.unwrap();
        assert_eq!(moved.status, Status::Done);
        assert_eq!(moved.position, Some(Position::new(0)));
        assert_eq!(store.position_write_count().await, 1);

        let entries = store.read_activity(None).await.unwrap();
        assert_eq!(entries[0].op, "move task");
        assert_eq!(entries[0].actor.as_deref(), Some("alice"));
        assert_eq!(entries[0].input["event"]["draggableId"], ids[1].as_str());
    }

    #[tokio::test]
    async fn test_cancelled_drag_is_not_logged() {
        let (store, ctx, board_id, ids) = setup().await;
        let event = DropEvent::cancelled(ids[0].clone(), DropLocation::in_column(Status::Todo, 0));

        let result = KanbanOperationProcessor::new()
            .process(&MoveTask::new(board_id, event), &ctx)
            .await
            .unwrap();

        assert_eq!(result["outcome"], "unchanged");
        assert_eq!(store.position_write_count().await, 0);
        assert!(store.read_activity(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_is_logged_and_returned() {
        let (store, ctx, board_id, ids) = setup().await;
        store.fail_position_writes(true).await;

        let result = KanbanOperationProcessor::new()
            .process(
                &MoveTask::new(board_id, drag(&ids[2], (Status::Todo, 2), (Status::InProgress, 0))),
                &ctx,
            )
            .await;

        assert!(matches!(result, Err(KanbanError::Persistence { attempted: 1, .. })));
        let entries = store.read_activity(None).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].output["error"]
            .as_str()
            .unwrap()
            .contains("failed to persist 1 of 1"));
    }

    #[tokio::test]
    async fn test_stranger_cannot_move() {
        let (store, _ctx, board_id, ids) = setup().await;
        let stranger = KanbanContext::new(store.clone(), "mallory");

        let result = MoveTask::new(board_id, drag(&ids[0], (Status::Todo, 0), (Status::Done, 0)))
            .execute(&stranger)
            .await
            .into_result();

        assert!(matches!(result, Err(KanbanError::NotAuthorized { .. })));
        assert_eq!(store.position_write_count().await, 0);
    }
}
