//! Storage and access-control collaborators.
//!
//! The engine only ever talks to storage through these traits. Every call is a
//! single-row operation; there is no multi-row transaction, so a batch of
//! position writes can partially fail.

mod file;
mod memory;

pub use file::{FileStore, StoreLock, STORE_DIR};
pub use memory::MemoryStore;

use crate::column::sort_by_column;
use crate::error::Result;
use crate::types::{Board, BoardId, Membership, NewTask, Position, Status, Task, TaskId, UserId};
use async_trait::async_trait;
use taskboard_operations::LogEntry;
use tracing::error;

/// Row-level task storage
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks of a board, grouped by column and ordered within each column
    async fn fetch_tasks(&self, board_id: &BoardId) -> Result<Vec<Task>>;

    async fn get_task(&self, id: &TaskId) -> Result<Task>;

    /// Overwrite one task's status and position
    async fn update_task_position(&self, id: &TaskId, status: Status, position: Position)
        -> Result<()>;

    /// Insert a task at `position`
    async fn create_task(
        &self,
        fields: NewTask,
        board_id: &BoardId,
        owner_id: &UserId,
        position: Position,
    ) -> Result<Task>;

    /// Overwrite a task's title and description
    async fn update_task(&self, task: &Task) -> Result<Task>;

    async fn delete_task(&self, id: &TaskId) -> Result<()>;
}

/// Boards and their memberships
#[async_trait]
pub trait BoardStore: Send + Sync {
    async fn create_board(&self, name: &str, owner_id: &UserId) -> Result<Board>;

    async fn get_board(&self, id: &BoardId) -> Result<Board>;

    /// Boards the user owns or is a member of, oldest first
    async fn list_boards_for(&self, user: &UserId) -> Result<Vec<Board>>;

    /// Idempotent: returns the existing membership if there is one
    async fn add_member(&self, board_id: &BoardId, user: &UserId) -> Result<Membership>;

    async fn members(&self, board_id: &BoardId) -> Result<Vec<Membership>>;
}

/// Board access checks, run before any board operation reaches the engine
#[async_trait]
pub trait AccessControl: Send + Sync {
    async fn can_access_board(&self, user: &UserId, board_id: &BoardId) -> Result<bool>;

    async fn is_board_owner(&self, user: &UserId, board_id: &BoardId) -> Result<bool>;
}

/// Owners and members may access a board; only the owner owns it.
#[async_trait]
impl<T> AccessControl for T
where
    T: BoardStore + ?Sized,
{
    async fn can_access_board(&self, user: &UserId, board_id: &BoardId) -> Result<bool> {
        let board = self.get_board(board_id).await?;
        if board.is_owned_by(user) {
            return Ok(true);
        }
        Ok(self
            .members(board_id)
            .await?
            .iter()
            .any(|m| &m.user_id == user))
    }

    async fn is_board_owner(&self, user: &UserId, board_id: &BoardId) -> Result<bool> {
        Ok(self.get_board(board_id).await?.is_owned_by(user))
    }
}

/// Append-only record of executed operations
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn append_activity(&self, entry: &LogEntry) -> Result<()>;

    /// Newest first
    async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>>;
}

/// Everything a board context needs from its backing store.
///
/// Access checks come from the `AccessControl` impl every `BoardStore` gets.
pub trait KanbanStore: TaskStore + BoardStore + ActivityLog {}

impl<T> KanbanStore for T where T: TaskStore + BoardStore + ActivityLog {}

/// Shared post-processing for fetched task rows: drop rows without an id,
/// then group by column and order each column.
pub(crate) fn finish_fetch(board_id: &BoardId, rows: Vec<Task>) -> Vec<Task> {
    let valid = rows
        .into_iter()
        .filter(|task| {
            if task.id.is_empty() {
                error!(board = %board_id, title = %task.title, "discarding task row without an id");
                return false;
            }
            true
        })
        .collect();
    sort_by_column(valid)
}
