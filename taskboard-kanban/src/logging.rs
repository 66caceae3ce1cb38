//! Log formatting helpers

use serde::Serialize;
use std::fmt::{self, Debug};

/// Renders a value as YAML on a fresh line inside tracing messages:
///
/// ```ignore
/// debug!("planned reorder: {}", Pretty(&plan.writes));
/// ```
///
/// Falls back to pretty `Debug` output if the value does not serialize.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}
