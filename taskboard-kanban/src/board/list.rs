//! ListBoards command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::store::BoardStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Boards the acting user owns or was invited to
#[operation(verb = "list", noun = "boards", description = "List boards visible to the current user")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListBoards {}

impl ListBoards {
    pub fn new() -> Self {
        Self::default()
    }

    async fn run(&self, ctx: &KanbanContext) -> Result<Value> {
        let boards = ctx.store().list_boards_for(ctx.actor()).await?;
        Ok(serde_json::json!({
            "count": boards.len(),
            "boards": boards,
        }))
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListBoards {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        ExecutionResult::from_result(self.run(ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CreateBoard, ShareBoard};
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_lists_owned_and_shared() {
        let store = Arc::new(MemoryStore::new());
        let alice = KanbanContext::new(store.clone(), "alice");
        let bob = KanbanContext::new(store, "bob");

        let board = CreateBoard::new("Roadmap")
            .execute(&alice)
            .await
            .into_result()
            .unwrap();
        CreateBoard::new("Bob's").execute(&bob).await.into_result().unwrap();

        let listed = ListBoards::new().execute(&alice).await.into_result().unwrap();
        assert_eq!(listed["count"], 1);

        let board_id = board["id"].as_str().unwrap();
        ShareBoard::new(board_id, "bob")
            .execute(&alice)
            .await
            .into_result()
            .unwrap();

        let listed = ListBoards::new().execute(&bob).await.into_result().unwrap();
        assert_eq!(listed["count"], 2);
    }

    #[tokio::test]
    async fn test_list_is_not_logged() {
        let ctx = KanbanContext::new(Arc::new(MemoryStore::new()), "alice");
        let result = ListBoards::new().execute(&ctx).await;
        assert!(!result.should_log());
    }
}
