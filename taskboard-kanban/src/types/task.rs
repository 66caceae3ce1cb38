//! Task types: Task, NewTask

use super::ids::{BoardId, TaskId, UserId};
use super::position::Position;
use super::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Blank when the stored row carried no id; such rows are discarded on fetch
    #[serde(default = "missing_id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub board_id: BoardId,
    /// Absent for rows written before positions existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub created_at: DateTime<Utc>,
    /// Creator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

fn missing_id() -> TaskId {
    TaskId::from_string("")
}

impl Task {
    /// Create a task in `status` with no position yet
    pub fn new(title: impl Into<String>, board_id: BoardId, status: Status) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: None,
            status,
            board_id,
            position: None,
            created_at: Utc::now(),
            user_id: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the position
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the id
    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the creator
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Position used for sorting; an absent position sorts as zero
    pub fn sort_position(&self) -> Position {
        self.position.unwrap_or(Position::ZERO)
    }

    /// Copy of this task placed at `status`/`position`
    pub fn placed(&self, status: Status, position: Position) -> Self {
        Self {
            status,
            position: Some(position),
            ..self.clone()
        }
    }
}

/// Fields supplied by the user when creating a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
}

impl NewTask {
    pub fn new(title: impl Into<String>, status: Status) -> Self {
        Self {
            title: title.into(),
            description: None,
            status,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
