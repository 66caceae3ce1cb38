//! Position values for ordering tasks within a column.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort key of a task inside its column.
///
/// Positions are spaced `STEP` apart so that later inserts have room between
/// neighbours. They carry no meaning across columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(i64);

impl Position {
    /// Spacing between allocated positions
    pub const STEP: i64 = 100;

    /// Sort value used for tasks stored without a position
    pub const ZERO: Position = Position(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Dense position for the task at `index` of a renumbered column; index 0 is 0
    pub fn at_index(index: usize) -> Self {
        let index = i64::try_from(index).unwrap_or(i64::MAX / Self::STEP);
        Self(index.saturating_mul(Self::STEP))
    }

    /// The next slot after this one
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(Self::STEP))
    }

    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Position {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
