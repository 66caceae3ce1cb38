//! KanbanContext - what every command runs against
//!
//! The context carries the store handle and the acting user. It has no board
//! logic of its own beyond the access checks commands run before touching a
//! board.

use crate::error::{KanbanError, Result};
use crate::session::BoardSession;
use crate::store::{AccessControl, KanbanStore};
use crate::types::{BoardId, UserId};
use std::sync::Arc;

/// Context passed to every command
#[derive(Clone)]
pub struct KanbanContext {
    store: Arc<dyn KanbanStore>,
    actor: UserId,
}

impl KanbanContext {
    pub fn new(store: Arc<dyn KanbanStore>, actor: impl Into<UserId>) -> Self {
        Self {
            store,
            actor: actor.into(),
        }
    }

    pub fn store(&self) -> &dyn KanbanStore {
        self.store.as_ref()
    }

    /// The user commands run as
    pub fn actor(&self) -> &UserId {
        &self.actor
    }

    /// Fail with `NotAuthorized` unless the actor owns or is a member of the board
    pub async fn require_access(&self, board_id: &BoardId) -> Result<()> {
        if self.store.can_access_board(&self.actor, board_id).await? {
            Ok(())
        } else {
            Err(self.not_authorized(board_id))
        }
    }

    /// Fail with `NotAuthorized` unless the actor owns the board
    pub async fn require_owner(&self, board_id: &BoardId) -> Result<()> {
        if self.store.is_board_owner(&self.actor, board_id).await? {
            Ok(())
        } else {
            Err(self.not_authorized(board_id))
        }
    }

    /// Load a session over the board's tasks. Access is not checked here.
    pub async fn session(&self, board_id: &BoardId) -> Result<BoardSession<dyn KanbanStore>> {
        BoardSession::load(board_id.clone(), Arc::clone(&self.store)).await
    }

    fn not_authorized(&self, board_id: &BoardId) -> KanbanError {
        KanbanError::NotAuthorized {
            user: self.actor.to_string(),
            board: board_id.to_string(),
        }
    }
}

impl std::fmt::Debug for KanbanContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KanbanContext")
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BoardStore, MemoryStore};

    #[tokio::test]
    async fn test_access_checks() {
        let store = Arc::new(MemoryStore::new());
        let alice = UserId::from("alice");
        let board = store.create_board("Roadmap", &alice).await.unwrap();
        store.add_member(&board.id, &UserId::from("bob")).await.unwrap();

        let owner = KanbanContext::new(store.clone(), "alice");
        owner.require_access(&board.id).await.unwrap();
        owner.require_owner(&board.id).await.unwrap();

        let member = KanbanContext::new(store.clone(), "bob");
        member.require_access(&board.id).await.unwrap();
        assert!(matches!(
            member.require_owner(&board.id).await,
            Err(KanbanError::NotAuthorized { .. })
        ));

        let stranger = KanbanContext::new(store, "carol");
        let err = stranger.require_access(&board.id).await.unwrap_err();
        assert!(matches!(err, KanbanError::NotAuthorized { ref user, .. } if user == "carol"));
    }
}
