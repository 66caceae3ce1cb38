//! FileStore - one JSON file per row under a `.taskboard` directory
//!
//! ```text
//! .taskboard/
//!   boards/{board_id}.json
//!   tasks/{task_id}.json
//!   members/{board_id}.json
//!   activity/current.jsonl
//!   .lock
//! ```

use super::{finish_fetch, ActivityLog, BoardStore, TaskStore};
use crate::error::{KanbanError, Result};
use crate::types::{Board, BoardId, Membership, NewTask, Position, Status, Task, TaskId, UserId};
use async_trait::async_trait;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use taskboard_operations::LogEntry;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Name of the store directory
pub const STORE_DIR: &str = ".taskboard";

/// Store rooted at a `.taskboard` directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Walk up from `start` looking for a `.taskboard` directory
    pub fn find(start: impl AsRef<Path>) -> Result<Self> {
        let mut current = start.as_ref().to_path_buf();

        loop {
            let dir = current.join(STORE_DIR);
            if dir.is_dir() {
                return Ok(Self::new(dir));
            }

            if !current.pop() {
                return Err(KanbanError::NotInitialized {
                    path: start.as_ref().to_path_buf(),
                });
            }
        }
    }

    /// Create a fresh store inside `parent`
    pub async fn init(parent: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new(parent.as_ref().join(STORE_DIR));
        if store.root.exists() {
            return Err(KanbanError::AlreadyExists { path: store.root });
        }
        store.create_directories().await?;
        debug!(root = %store.root.display(), "initialized store");
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn boards_dir(&self) -> PathBuf {
        self.root.join("boards")
    }

    fn board_path(&self, id: &BoardId) -> Result<PathBuf> {
        row_path(self.boards_dir(), "board_id", id.as_str())
    }

    fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    fn task_path(&self, id: &TaskId) -> Result<PathBuf> {
        row_path(self.tasks_dir(), "task_id", id.as_str())
    }

    fn members_dir(&self) -> PathBuf {
        self.root.join("members")
    }

    fn members_path(&self, board_id: &BoardId) -> Result<PathBuf> {
        row_path(self.members_dir(), "board_id", board_id.as_str())
    }

    fn activity_dir(&self) -> PathBuf {
        self.root.join("activity")
    }

    fn activity_path(&self) -> PathBuf {
        self.activity_dir().join("current.jsonl")
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    pub fn directories_exist(&self) -> bool {
        self.root.exists()
            && self.boards_dir().exists()
            && self.tasks_dir().exists()
            && self.members_dir().exists()
            && self.activity_dir().exists()
    }

    /// Idempotent
    pub async fn create_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::create_dir_all(self.boards_dir()).await?;
        fs::create_dir_all(self.tasks_dir()).await?;
        fs::create_dir_all(self.members_dir()).await?;
        fs::create_dir_all(self.activity_dir()).await?;
        Ok(())
    }

    pub async fn ensure_directories(&self) -> Result<()> {
        if !self.directories_exist() {
            self.create_directories().await?;
        }
        Ok(())
    }

    /// Try to take the store-wide exclusive lock without blocking
    pub async fn lock(&self) -> Result<StoreLock> {
        fs::create_dir_all(&self.root).await?;

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.lock_path())?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(StoreLock { file }),
            Err(_) => Err(KanbanError::LockBusy),
        }
    }

    async fn read_task(&self, id: &TaskId) -> Result<Task> {
        read_json(&self.task_path(id)?)
            .await?
            .ok_or_else(|| KanbanError::TaskNotFound { id: id.to_string() })
    }

    async fn write_task(&self, task: &Task) -> Result<()> {
        write_json(&self.task_path(&task.id)?, task).await
    }

    async fn read_members(&self, board_id: &BoardId) -> Result<Vec<Membership>> {
        Ok(read_json(&self.members_path(board_id)?)
            .await?
            .unwrap_or_default())
    }

    async fn read_all_tasks(&self) -> Result<Vec<Task>> {
        let dir = self.tasks_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut tasks = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(task) = read_json::<Task>(&path).await? {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    async fn read_all_boards(&self) -> Result<Vec<Board>> {
        let dir = self.boards_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut boards = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(board) = read_json::<Board>(&path).await? {
                boards.push(board);
            }
        }
        Ok(boards)
    }
}

#[async_trait]
impl TaskStore for FileStore {
    async fn fetch_tasks(&self, board_id: &BoardId) -> Result<Vec<Task>> {
        self.get_board(board_id).await?;
        let rows = self
            .read_all_tasks()
            .await?
            .into_iter()
            .filter(|t| &t.board_id == board_id)
            .collect();
        Ok(finish_fetch(board_id, rows))
    }

    async fn get_task(&self, id: &TaskId) -> Result<Task> {
        self.read_task(id).await
    }

    async fn update_task_position(
        &self,
        id: &TaskId,
        status: Status,
        position: Position,
    ) -> Result<()> {
        let mut task = self.read_task(id).await?;
        task.status = status;
        task.position = Some(position);
        self.write_task(&task).await
    }

    async fn create_task(
        &self,
        fields: NewTask,
        board_id: &BoardId,
        owner_id: &UserId,
        position: Position,
    ) -> Result<Task> {
        self.get_board(board_id).await?;
        let mut task = Task::new(fields.title, board_id.clone(), fields.status)
            .with_position(position)
            .with_user(owner_id.clone());
        task.description = fields.description;
        self.write_task(&task).await?;
        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> Result<Task> {
        let mut stored = self.read_task(&task.id).await?;
        stored.title = task.title.clone();
        stored.description = task.description.clone();
        self.write_task(&stored).await?;
        Ok(stored)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let path = self.task_path(id)?;
        if !path.exists() {
            return Err(KanbanError::TaskNotFound { id: id.to_string() });
        }
        fs::remove_file(&path).await?;
        Ok(())
    }
}

#[async_trait]
impl BoardStore for FileStore {
    async fn create_board(&self, name: &str, owner_id: &UserId) -> Result<Board> {
        self.ensure_directories().await?;
        let board = Board::new(name, owner_id.clone());
        write_json(&self.board_path(&board.id)?, &board).await?;
        Ok(board)
    }

    async fn get_board(&self, id: &BoardId) -> Result<Board> {
        read_json(&self.board_path(id)?)
            .await?
            .ok_or_else(|| KanbanError::BoardNotFound { id: id.to_string() })
    }

    async fn list_boards_for(&self, user: &UserId) -> Result<Vec<Board>> {
        let mut visible = Vec::new();
        for board in self.read_all_boards().await? {
            if board.is_owned_by(user)
                || self
                    .read_members(&board.id)
                    .await?
                    .iter()
                    .any(|m| &m.user_id == user)
            {
                visible.push(board);
            }
        }
        visible.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(visible)
    }

    async fn add_member(&self, board_id: &BoardId, user: &UserId) -> Result<Membership> {
        self.get_board(board_id).await?;
        let _lock = self.lock().await?;

        let mut members = self.read_members(board_id).await?;
        if let Some(existing) = members.iter().find(|m| &m.user_id == user) {
            return Ok(existing.clone());
        }
        let membership = Membership::new(board_id.clone(), user.clone());
        members.push(membership.clone());
        write_json(&self.members_path(board_id)?, &members).await?;
        Ok(membership)
    }

    async fn members(&self, board_id: &BoardId) -> Result<Vec<Membership>> {
        self.read_members(board_id).await
    }
}

#[async_trait]
impl ActivityLog for FileStore {
    async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        fs::create_dir_all(self.activity_dir()).await?;

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.activity_path())
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let path = self.activity_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut entries: Vec<LogEntry> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .filter_map(|(index, line)| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(line = index + 1, error = %e, "skipping corrupt activity entry");
                    None
                }
            })
            .collect();
        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}

/// `{dir}/{id}.json`, refusing ids that would leave `dir`
fn row_path(dir: PathBuf, field: &str, id: &str) -> Result<PathBuf> {
    if id.is_empty() || id == "." || id.contains("..") || id.contains(['/', '\\']) {
        return Err(KanbanError::invalid_value(
            field,
            format!("'{}' is not a valid id", id),
        ));
    }
    Ok(dir.join(format!("{}.json", id)))
}

/// Exclusive store lock, released on drop
pub struct StoreLock {
    file: std::fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// `Ok(None)` when the file does not exist
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).await?;
    Ok(Some(serde_json::from_str(&content)?))
}

async fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    atomic_write(path, content.as_bytes()).await
}

/// Write to a sibling temp file, then rename over the target
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}
