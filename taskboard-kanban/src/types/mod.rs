//! Core types for the board engine

mod board;
mod ids;
mod position;
mod status;
mod task;

// Re-export all types
pub use board::{Board, Membership};
pub use ids::{BoardId, TaskId, UserId};
pub use position::Position;
pub use status::Status;
pub use task::{NewTask, Task};
