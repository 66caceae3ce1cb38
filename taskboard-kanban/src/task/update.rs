//! UpdateTask command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::processor::logged;
use crate::store::TaskStore;
use crate::types::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::info;

/// Edit a task's title and description. Status and position change only by moving.
#[operation(verb = "update", noun = "task", description = "Edit a task's title or description")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTask {
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// An empty description clears it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    async fn run(&self, ctx: &KanbanContext) -> Result<Value> {
        let mut task = ctx.store().get_task(&self.id).await?;
        ctx.require_access(&task.board_id).await?;

        if let Some(title) = &self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(KanbanError::missing_field("title"));
            }
            task.title = title.to_string();
        }

        if let Some(description) = &self.description {
            let description = description.trim();
            task.description = (!description.is_empty()).then(|| description.to_string());
        }

        let task = ctx.store().update_task(&task).await?;
        info!(task = %task.id, "updated task");
        Ok(serde_json::to_value(&task)?)
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for UpdateTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let started = Instant::now();
        logged(self, started, self.run(ctx).await)
    }
}
