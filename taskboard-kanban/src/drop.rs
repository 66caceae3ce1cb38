//! Drag-and-drop input boundary.
//!
//! A drop event arrives in the shape the board UI emits: the dragged card id,
//! the column and index it was picked up from, and the column and index it was
//! released over (absent when released outside every column).

use crate::error::Result;
use crate::plan::MoveRequest;
use crate::types::{Status, TaskId};
use serde::{Deserialize, Serialize};

/// Column id and index within it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropLocation {
    pub droppable_id: String,
    pub index: usize,
}

impl DropLocation {
    pub fn new(droppable_id: impl Into<String>, index: usize) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            index,
        }
    }

    /// A location in a known column
    pub fn in_column(status: Status, index: usize) -> Self {
        Self::new(status.as_str(), index)
    }

    fn status(&self) -> Result<Status> {
        self.droppable_id.parse()
    }
}

/// The end of one drag gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEvent {
    pub draggable_id: TaskId,
    pub source: DropLocation,
    #[serde(default)]
    pub destination: Option<DropLocation>,
}

impl DropEvent {
    /// A completed drop
    pub fn new(draggable_id: impl Into<TaskId>, source: DropLocation, destination: DropLocation) -> Self {
        Self {
            draggable_id: draggable_id.into(),
            source,
            destination: Some(destination),
        }
    }

    /// A drag released outside every column
    pub fn cancelled(draggable_id: impl Into<TaskId>, source: DropLocation) -> Self {
        Self {
            draggable_id: draggable_id.into(),
            source,
            destination: None,
        }
    }

    /// The move this drop asks for.
    ///
    /// `Ok(None)` for a cancelled drag and for a drop back onto the same
    /// column and index; neither may cause a write.
    ///
    /// # Errors
    ///
    /// `InvalidValue` when either column id is not a known status.
    pub fn to_move(&self) -> Result<Option<MoveRequest>> {
        let Some(destination) = &self.destination else {
            return Ok(None);
        };

        let mv = MoveRequest::new(
            self.draggable_id.clone(),
            (self.source.status()?, self.source.index),
            (destination.status()?, destination.index),
        );

        Ok((!mv.is_in_place()).then_some(mv))
    }
}
