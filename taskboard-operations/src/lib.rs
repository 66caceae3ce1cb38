//! # Taskboard Operations
//!
//! Commands are structs whose fields are their inputs. The `#[operation]`
//! attribute supplies the verb/noun metadata, `Execute` supplies the behavior,
//! and an `OperationProcessor` runs them and records what happened.
//!
//! ## Example
//!
//! ```ignore
//! use taskboard_operations::*;
//!
//! #[operation(verb = "add", noun = "task", description = "Create a new task")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddTask {
//!     pub board_id: BoardId,
//!     pub title: String,
//! }
//!
//! #[async_trait]
//! impl Execute<KanbanContext, KanbanError> for AddTask {
//!     async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
//!         // returns ExecutionResult::Logged for writes, Unlogged for reads
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

// Re-export proc macros
pub use taskboard_operations_macros::operation;

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
