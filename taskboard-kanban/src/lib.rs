//! Task ordering and drag-and-drop reconciliation for a three-column board
//!
//! Tasks live in one of three columns (`todo`, `in_progress`, `done`) and are
//! ordered within a column by an integer position. This crate decides where a
//! new task goes, how a column is ordered, what a drag-and-drop move changes,
//! and how those changes are applied locally and persisted.
//!
//! ## Overview
//!
//! - **Allocator** - `next_position` puts new tasks at the end of a column
//! - **Partitioner** - `tasks_in_column` orders one column: position, then creation time
//! - **Planner** - `plan` turns a move into the new collection plus the position writes
//! - **Session** - `BoardSession` applies a plan at once, persists it concurrently, and
//!   keeps the optimistic order if a write fails
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskboard_kanban::{
//!     board::CreateBoard, task::{AddTask, MoveTask}, DropEvent, DropLocation, Execute,
//!     FileStore, KanbanContext, Status,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileStore::init("/path/to/project").await?;
//! let ctx = KanbanContext::new(Arc::new(store), "alice");
//!
//! let board = CreateBoard::new("Roadmap").execute(&ctx).await.into_result()?;
//! let board_id = board["id"].as_str().unwrap_or_default();
//!
//! let task = AddTask::new(board_id, "Write docs").execute(&ctx).await.into_result()?;
//! let task_id = task["id"].as_str().unwrap_or_default();
//!
//! let drop = DropEvent::new(
//!     task_id,
//!     DropLocation::in_column(Status::Todo, 0),
//!     DropLocation::in_column(Status::InProgress, 0),
//! );
//! MoveTask::new(board_id, drop).execute(&ctx).await.into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod allocator;
pub mod column;
mod context;
pub mod drop;
mod error;
mod logging;
pub mod plan;
mod processor;
pub mod session;
pub mod store;
pub mod types;

// Command modules
pub mod board;
pub mod task;

pub use taskboard_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use allocator::{next_position, next_position_in_column};
pub use column::{partition, tasks_in_column, ColumnView};
pub use context::KanbanContext;
pub use drop::{DropEvent, DropLocation};
pub use error::{KanbanError, Result, WriteFailure};
pub use plan::{plan, MoveRequest, PositionWrite, ReorderPlan};
pub use processor::KanbanOperationProcessor;
pub use session::{BoardSession, DropOutcome, GesturePhase, PendingPersist, PersistOutcome};
pub use store::{
    AccessControl, ActivityLog, BoardStore, FileStore, KanbanStore, MemoryStore, StoreLock,
    TaskStore, STORE_DIR,
};

pub use types::{Board, BoardId, Membership, NewTask, Position, Status, Task, TaskId, UserId};
