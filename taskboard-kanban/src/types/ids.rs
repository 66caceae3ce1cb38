//! Identifier newtypes
//!
//! Ids are opaque strings. Freshly minted ones are ULIDs; ids read back from a
//! store are taken verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Mint a fresh id
            pub fn new() -> Self {
                Self(ulid::Ulid::new().to_string())
            }

            /// Wrap an existing id string
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the inner string value
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// An id read from storage can be blank when the row is malformed
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifies a task
    TaskId
);
define_id!(
    /// Identifies a board
    BoardId
);
define_id!(
    /// Identifies an authenticated user
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_differ() {
        assert_ne!(TaskId::new(), TaskId::new());
    }

    #[test]
    fn test_serde_transparent() {
        let id = BoardId::from_string("b-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"b-1\"");
        let back: BoardId = serde_json::from_str("\"b-1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_blank_id() {
        assert!(TaskId::from_string("  ").is_empty());
        assert!(!TaskId::from("t1").is_empty());
    }
}
