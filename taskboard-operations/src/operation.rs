//! The `Operation` metadata trait and the `Execute` behavior trait

use crate::ExecutionResult;
use async_trait::async_trait;

/// Metadata every command carries. Implemented by `#[operation]`.
pub trait Operation: Send + Sync {
    /// Action word, e.g. "move"
    fn verb(&self) -> &'static str;

    /// Target entity, e.g. "task"
    fn noun(&self) -> &'static str;

    /// Human readable description
    fn description(&self) -> &'static str;

    /// Canonical op string used in activity logs ("move task")
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run a command against a context `C`, failing with `E`.
#[async_trait]
pub trait Execute<C, E>: Operation
where
    C: Send + Sync,
    E: Send,
{
    /// Execute the command
    async fn execute(&self, ctx: &C) -> ExecutionResult<serde_json::Value, E>;
}
