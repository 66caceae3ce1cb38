//! DeleteTask command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::processor::logged;
use crate::store::TaskStore;
use crate::types::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::info;

/// Delete a task. The rest of its column keeps its positions.
#[operation(verb = "delete", noun = "task", description = "Delete a task")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteTask {
    pub id: TaskId,
}

impl DeleteTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }

    async fn run(&self, ctx: &KanbanContext) -> Result<Value> {
        let task = ctx.store().get_task(&self.id).await?;
        ctx.require_access(&task.board_id).await?;

        ctx.store().delete_task(&self.id).await?;
        info!(task = %self.id, board = %task.board_id, "deleted task");
        Ok(json!({
            "deleted": true,
            "id": self.id,
            "title": task.title,
        }))
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for DeleteTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let started = Instant::now();
        logged(self, started, self.run(ctx).await)
    }
}
