//! KanbanOperationProcessor - runs commands and appends their entries to the
//! store's activity log

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::store::ActivityLog;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{ExecutionResult, LogEntry, Operation, OperationProcessor};

/// Processor for board commands.
///
/// Entries are stamped with the processor's actor when it has one, otherwise
/// with the context's acting user.
#[derive(Debug, Default, Clone)]
pub struct KanbanOperationProcessor {
    actor: Option<String>,
}

impl KanbanOperationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute every entry to `actor`
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }
}

#[async_trait]
impl OperationProcessor<KanbanContext, KanbanError> for KanbanOperationProcessor {
    fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    async fn write_log(&self, ctx: &KanbanContext, entry: &LogEntry) -> Result<()> {
        if entry.actor.is_some() {
            return ctx.store().append_activity(entry).await;
        }
        let entry = entry.clone().with_actor(ctx.actor().as_str());
        ctx.store().append_activity(&entry).await
    }
}

/// Wrap a write command's result: success is logged with the command as input
pub(crate) fn logged<O>(
    op: &O,
    started: Instant,
    result: Result<Value>,
) -> ExecutionResult<Value, KanbanError>
where
    O: Operation + Serialize,
{
    match result {
        Ok(value) => ExecutionResult::Logged {
            log_entry: LogEntry::since(op.op_string(), input_of(op), value.clone(), started),
            value,
        },
        Err(error) => ExecutionResult::Failed {
            error,
            log_entry: None,
        },
    }
}

/// A failure that still changed state and belongs in the log
pub(crate) fn failed_logged<O>(
    op: &O,
    started: Instant,
    error: KanbanError,
) -> ExecutionResult<Value, KanbanError>
where
    O: Operation + Serialize,
{
    let output = serde_json::json!({ "error": error.to_string() });
    ExecutionResult::Failed {
        log_entry: Some(LogEntry::since(op.op_string(), input_of(op), output, started)),
        error,
    }
}

fn input_of<O: Serialize>(op: &O) -> Value {
    serde_json::to_value(op).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use taskboard_operations::{operation, Execute};

    #[operation(verb = "touch", noun = "board", description = "Test write")]
    #[derive(Debug, Serialize)]
    struct Touch {
        fail: bool,
    }

    #[async_trait]
    impl Execute<KanbanContext, KanbanError> for Touch {
        async fn execute(&self, _ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
            let result = if self.fail {
                Err(KanbanError::storage("boom"))
            } else {
                Ok(serde_json::json!({"ok": true}))
            };
            logged(self, Instant::now(), result)
        }
    }

    #[tokio::test]
    async fn test_actor_defaults_to_context_user() {
        let store = Arc::new(MemoryStore::new());
        let ctx = KanbanContext::new(store.clone(), "alice");

        KanbanOperationProcessor::new()
            .process(&Touch { fail: false }, &ctx)
            .await
            .unwrap();
        KanbanOperationProcessor::with_actor("bot[ci]")
            .process(&Touch { fail: false }, &ctx)
            .await
            .unwrap();

        let entries = store.read_activity(None).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].actor.as_deref(), Some("bot[ci]"));
        assert_eq!(entries[1].actor.as_deref(), Some("alice"));
        assert_eq!(entries[1].op, "touch board");
        assert_eq!(entries[1].input["fail"], false);
    }

    #[tokio::test]
    async fn test_unlogged_failure_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let ctx = KanbanContext::new(store.clone(), "alice");

        let result = KanbanOperationProcessor::new()
            .process(&Touch { fail: true }, &ctx)
            .await;
        assert!(matches!(result, Err(KanbanError::Storage { .. })));
        assert!(store.read_activity(None).await.unwrap().is_empty());
    }
}
