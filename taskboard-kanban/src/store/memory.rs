//! In-process store, used by tests and embedders without persistence.
//!
//! Position writes can be made to fail or stall on demand so the
//! reconciler's failure and in-flight paths can be exercised.

use super::{finish_fetch, ActivityLog, BoardStore, TaskStore};
use crate::error::{KanbanError, Result};
use crate::types::{Board, BoardId, Membership, NewTask, Position, Status, Task, TaskId, UserId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use taskboard_operations::LogEntry;
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryState {
    boards: HashMap<BoardId, Board>,
    tasks: HashMap<TaskId, Task>,
    memberships: Vec<Membership>,
    activity: Vec<LogEntry>,
    position_writes: usize,
}

#[derive(Default)]
struct WriteFaults {
    fail_all: bool,
    fail_tasks: HashSet<TaskId>,
    delay: Option<Duration>,
}

/// Store backed by in-memory maps
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    faults: RwLock<WriteFaults>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows as-is, bypassing position allocation
    pub async fn seed(&self, board: Board, tasks: impl IntoIterator<Item = Task>) {
        let mut state = self.state.write().await;
        for task in tasks {
            state.tasks.insert(task.id.clone(), task);
        }
        state.boards.insert(board.id.clone(), board);
    }

    /// Reject every position write from now on
    pub async fn fail_position_writes(&self, fail: bool) {
        self.faults.write().await.fail_all = fail;
    }

    /// Reject position writes for one task
    pub async fn fail_position_writes_for(&self, id: &TaskId) {
        self.faults.write().await.fail_tasks.insert(id.clone());
    }

    /// Hold every position write for `delay` before applying it
    pub async fn delay_position_writes(&self, delay: Duration) {
        self.faults.write().await.delay = Some(delay);
    }

    /// Number of position writes that reached storage
    pub async fn position_write_count(&self) -> usize {
        self.state.read().await.position_writes
    }

    async fn check_board(&self, id: &BoardId) -> Result<()> {
        if self.state.read().await.boards.contains_key(id) {
            Ok(())
        } else {
            Err(KanbanError::BoardNotFound { id: id.to_string() })
        }
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn fetch_tasks(&self, board_id: &BoardId) -> Result<Vec<Task>> {
        self.check_board(board_id).await?;
        let rows = self
            .state
            .read()
            .await
            .tasks
            .values()
            .filter(|t| &t.board_id == board_id)
            .cloned()
            .collect();
        Ok(finish_fetch(board_id, rows))
    }

    async fn get_task(&self, id: &TaskId) -> Result<Task> {
        self.state
            .read()
            .await
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| KanbanError::TaskNotFound { id: id.to_string() })
    }

    async fn update_task_position(
        &self,
        id: &TaskId,
        status: Status,
        position: Position,
    ) -> Result<()> {
        let (fail, delay) = {
            let faults = self.faults.read().await;
            (faults.fail_all || faults.fail_tasks.contains(id), faults.delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(KanbanError::storage(format!(
                "position write rejected for task {}",
                id
            )));
        }

        let mut state = self.state.write().await;
        let task = state
            .tasks
            .get_mut(id)
            .ok_or_else(|| KanbanError::TaskNotFound { id: id.to_string() })?;
        task.status = status;
        task.position = Some(position);
        state.position_writes += 1;
        Ok(())
    }

    async fn create_task(
        &self,
        fields: NewTask,
        board_id: &BoardId,
        owner_id: &UserId,
        position: Position,
    ) -> Result<Task> {
        self.check_board(board_id).await?;
        let mut task = Task::new(fields.title, board_id.clone(), fields.status)
            .with_position(position)
            .with_user(owner_id.clone());
        task.description = fields.description;

        self.state
            .write()
            .await
            .tasks
            .insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> Result<Task> {
        let mut state = self.state.write().await;
        let stored = state
            .tasks
            .get_mut(&task.id)
            .ok_or_else(|| KanbanError::TaskNotFound {
                id: task.id.to_string(),
            })?;
        stored.title = task.title.clone();
        stored.description = task.description.clone();
        Ok(stored.clone())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        self.state
            .write()
            .await
            .tasks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| KanbanError::TaskNotFound { id: id.to_string() })
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn create_board(&self, name: &str, owner_id: &UserId) -> Result<Board> {
        let board = Board::new(name, owner_id.clone());
        self.state
            .write()
            .await
            .boards
            .insert(board.id.clone(), board.clone());
        Ok(board)
    }

    async fn get_board(&self, id: &BoardId) -> Result<Board> {
        self.state
            .read()
            .await
            .boards
            .get(id)
            .cloned()
            .ok_or_else(|| KanbanError::BoardNotFound { id: id.to_string() })
    }

    async fn list_boards_for(&self, user: &UserId) -> Result<Vec<Board>> {
        let state = self.state.read().await;
        let shared: HashSet<&BoardId> = state
            .memberships
            .iter()
            .filter(|m| &m.user_id == user)
            .map(|m| &m.board_id)
            .collect();
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .filter(|b| b.is_owned_by(user) || shared.contains(&b.id))
            .cloned()
            .collect();
        boards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(boards)
    }

    async fn add_member(&self, board_id: &BoardId, user: &UserId) -> Result<Membership> {
        self.check_board(board_id).await?;
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .memberships
            .iter()
            .find(|m| &m.board_id == board_id && &m.user_id == user)
        {
            return Ok(existing.clone());
        }
        let membership = Membership::new(board_id.clone(), user.clone());
        state.memberships.push(membership.clone());
        Ok(membership)
    }

    async fn members(&self, board_id: &BoardId) -> Result<Vec<Membership>> {
        Ok(self
            .state
            .read()
            .await
            .memberships
            .iter()
            .filter(|m| &m.board_id == board_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ActivityLog for MemoryStore {
    async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        self.state.write().await.activity.push(entry.clone());
        Ok(())
    }

    async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let state = self.state.read().await;
        let newest_first = state.activity.iter().rev().cloned();
        Ok(match limit {
            Some(limit) => newest_first.take(limit).collect(),
            None => newest_first.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> (MemoryStore, Board, UserId) {
        let store = MemoryStore::new();
        let owner = UserId::from("alice");
        let board = store.create_board("Test", &owner).await.unwrap();
        (store, board, owner)
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let (store, board, owner) = setup().await;

        let created = store
            .create_task(
                NewTask::new("First", Status::Todo).with_description("details"),
                &board.id,
                &owner,
                Position::new(100),
            )
            .await
            .unwrap();
        assert_eq!(created.position, Some(Position::new(100)));
        assert_eq!(created.user_id, Some(owner.clone()));

        let tasks = store.fetch_tasks(&board.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description.as_deref(), Some("details"));
    }

    #[tokio::test]
    async fn test_fetch_unknown_board() {
        let store = MemoryStore::new();
        let result = store.fetch_tasks(&BoardId::from("nope")).await;
        assert!(matches!(result, Err(KanbanError::BoardNotFound { .. })));
    }

    #[tokio::test]
    async fn test_position_write_and_failure_injection() {
        let (store, board, owner) = setup().await;
        let task = store
            .create_task(NewTask::new("A", Status::Todo), &board.id, &owner, Position::new(100))
            .await
            .unwrap();

        store
            .update_task_position(&task.id, Status::Done, Position::new(0))
            .await
            .unwrap();
        let stored = store.get_task(&task.id).await.unwrap();
        assert_eq!(stored.status, Status::Done);
        assert_eq!(stored.position, Some(Position::new(0)));
        assert_eq!(store.position_write_count().await, 1);

        store.fail_position_writes_for(&task.id).await;
        let result = store
            .update_task_position(&task.id, Status::Todo, Position::new(100))
            .await;
        assert!(matches!(result, Err(KanbanError::Storage { .. })));
        assert_eq!(store.get_task(&task.id).await.unwrap().status, Status::Done);
        assert_eq!(store.position_write_count().await, 1);
    }

    #[tokio::test]
    async fn test_list_boards_owned_and_shared() {
        let (store, board, owner) = setup().await;
        let bob = UserId::from("bob");
        let other = store.create_board("Bob's", &bob).await.unwrap();

        assert_eq!(store.list_boards_for(&owner).await.unwrap(), vec![board.clone()]);

        store.add_member(&board.id, &bob).await.unwrap();
        store.add_member(&board.id, &bob).await.unwrap();
        assert_eq!(store.members(&board.id).await.unwrap().len(), 1);

        let ids: HashSet<BoardId> = store
            .list_boards_for(&bob)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, HashSet::from([board.id, other.id]));
    }

    #[tokio::test]
    async fn test_activity_newest_first() {
        let store = MemoryStore::new();
        for op in ["add task", "move task", "delete task"] {
            let entry = LogEntry::new(op, serde_json::json!({}), serde_json::json!({}), None, 0);
            store.append_activity(&entry).await.unwrap();
        }
        let entries = store.read_activity(Some(2)).await.unwrap();
        let ops: Vec<&str> = entries.iter().map(|e| e.op.as_str()).collect();
        assert_eq!(ops, ["delete task", "move task"]);
    }
}
