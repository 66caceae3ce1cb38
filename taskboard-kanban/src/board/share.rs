//! ShareBoard command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::processor::logged;
use crate::store::BoardStore;
use crate::types::{BoardId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::info;

/// Give another user access to a board. Only the owner may share.
#[operation(verb = "share", noun = "board", description = "Grant a user access to a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ShareBoard {
    pub board_id: BoardId,
    pub user_id: UserId,
}

impl ShareBoard {
    pub fn new(board_id: impl Into<BoardId>, user_id: impl Into<UserId>) -> Self {
        Self {
            board_id: board_id.into(),
            user_id: user_id.into(),
        }
    }

    async fn run(&self, ctx: &KanbanContext) -> Result<Value> {
        if self.user_id.is_empty() {
            return Err(KanbanError::missing_field("user_id"));
        }
        ctx.require_owner(&self.board_id).await?;

        let membership = ctx.store().add_member(&self.board_id, &self.user_id).await?;
        info!(board = %self.board_id, user = %self.user_id, "shared board");
        Ok(serde_json::to_value(&membership)?)
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ShareBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let started = Instant::now();
        logged(self, started, self.run(ctx).await)
    }
}
