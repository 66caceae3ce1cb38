//! AddTask command

use crate::allocator::next_position_in_column;
use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::processor::logged;
use crate::store::TaskStore;
use crate::types::{BoardId, NewTask, Status};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::info;

/// Add a task to the end of a column
#[operation(verb = "add", noun = "task", description = "Create a new task at the end of a column")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddTask {
    pub board_id: BoardId,
    /// Trimmed; must not be empty
    pub title: String,
    pub description: Option<String>,
    /// Column to add to, `todo` unless given
    #[serde(default)]
    pub status: Status,
}

impl AddTask {
    pub fn new(board_id: impl Into<BoardId>, title: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            title: title.into(),
            description: None,
            status: Status::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    async fn run(&self, ctx: &KanbanContext) -> Result<Value> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(KanbanError::missing_field("title"));
        }
        ctx.require_access(&self.board_id).await?;

        let existing = ctx.store().fetch_tasks(&self.board_id).await?;
        let position = next_position_in_column(&existing, self.status);

        let mut fields = NewTask::new(title, self.status);
        fields.description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let task = ctx
            .store()
            .create_task(fields, &self.board_id, ctx.actor(), position)
            .await?;
        info!(task = %task.id, board = %self.board_id, status = %task.status, %position, "added task");
        Ok(serde_json::to_value(&task)?)
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let started = Instant::now();
        logged(self, started, self.run(ctx).await)
    }
}
