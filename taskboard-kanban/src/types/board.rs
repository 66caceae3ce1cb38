//! Board-level types: Board, Membership

use super::ids::{BoardId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A board owned by one user; tasks reference it by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Board {
    /// Create a new board with the given name
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            id: BoardId::new(),
            name: name.into(),
            owner_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }
}

/// Grants a non-owner access to a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub board_id: BoardId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(board_id: BoardId, user_id: UserId) -> Self {
        Self {
            board_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}
