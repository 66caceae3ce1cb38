//! CreateBoard command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::processor::logged;
use crate::store::BoardStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::info;

/// Create a board owned by the acting user
#[operation(verb = "create", noun = "board", description = "Create a new board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBoard {
    pub name: String,
}

impl CreateBoard {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    async fn run(&self, ctx: &KanbanContext) -> Result<Value> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(KanbanError::missing_field("name"));
        }

        let board = ctx.store().create_board(name, ctx.actor()).await?;
        info!(board = %board.id, owner = %board.owner_id, "created board");
        Ok(serde_json::to_value(&board)?)
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CreateBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let started = Instant::now();
        logged(self, started, self.run(ctx).await)
    }
}
