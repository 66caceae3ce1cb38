//! Operation processor trait

use crate::{Execute, ExecutionResult, LogEntry};
use async_trait::async_trait;
use serde_json::Value;

/// Runs operations and persists their log entries.
///
/// Implementations decide where entries go and who the actor is; `process`
/// is provided in terms of `write_log`.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    /// Actor stamped onto every entry this processor writes
    fn actor(&self) -> Option<&str>;

    /// Persist one log entry
    async fn write_log(&self, ctx: &C, entry: &LogEntry) -> Result<(), E>;

    /// Execute an operation and record its log entry, if any
    async fn process<O>(&self, operation: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E> + ?Sized,
    {
        let result: ExecutionResult<Value, E> = operation.execute(ctx).await;
        let (value, entry) = result.split();

        if let Some(mut entry) = entry {
            if entry.actor.is_none() {
                entry.actor = self.actor().map(str::to_string);
            }
            self.write_log(ctx, &entry).await?;
        }

        value
    }
}
