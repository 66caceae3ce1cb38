//! ListTasks command

use crate::column::partition;
use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::store::TaskStore;
use crate::types::BoardId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// A board's tasks, column by column, in display order
#[operation(verb = "list", noun = "tasks", description = "List a board's tasks by column")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ListTasks {
    pub board_id: BoardId,
}

impl ListTasks {
    pub fn new(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: board_id.into(),
        }
    }

    async fn run(&self, ctx: &KanbanContext) -> Result<Value> {
        ctx.require_access(&self.board_id).await?;
        let tasks = ctx.store().fetch_tasks(&self.board_id).await?;

        let columns: Vec<Value> = partition(&tasks)
            .into_iter()
            .map(|(status, column)| {
                json!({
                    "status": status,
                    "title": status.title(),
                    "count": column.len(),
                    "tasks": column,
                })
            })
            .collect();

        Ok(json!({
            "board_id": self.board_id,
            "columns": columns,
        }))
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListTasks {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        ExecutionResult::from_result(self.run(ctx).await)
    }
}
