//! BoardSession - the single writer of one board's task collection.
//!
//! A drag gesture runs in two halves. `apply` swaps the planned collection in
//! synchronously and hands back a [`PendingPersist`] that owns the writes, so
//! the caller can keep rendering from `tasks()` while the batch is awaited or
//! spawned. `settle` folds the batch's outcome back in.
//!
//! A failed batch surfaces an error message and leaves the optimistic state in
//! place. Nothing is rolled back; `reload` resynchronizes from storage.

use crate::column::ColumnView;
use crate::drop::DropEvent;
use crate::error::{KanbanError, Result, WriteFailure};
use crate::plan::{plan, MoveRequest, PositionWrite, ReorderPlan};
use crate::store::TaskStore;
use crate::types::{BoardId, Status, Task, TaskId};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Message surfaced to the user when any position write fails
pub const PERSIST_FAILED_MESSAGE: &str = "Failed to update task position. Please try again.";

/// Where the session is in the drag gesture cycle.
///
/// Planning and local application are synchronous, so between calls a session
/// is only ever idle, waiting on writes, or showing an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Idle,
    Persisting,
    ErrorSurfaced,
}

/// What a drop did to the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    /// Cancelled, or dropped where it was picked up
    Unchanged,
    /// The dragged task is not in the collection
    TaskMissing { task_id: TaskId },
    /// Applied locally and persisted
    Moved { writes: Vec<PositionWrite> },
}

/// Result of one batch of position writes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistOutcome {
    pub attempted: usize,
    pub failed: Vec<WriteFailure>,
}

impl PersistOutcome {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.failed.is_empty() {
            Ok(())
        } else {
            Err(KanbanError::Persistence {
                attempted: self.attempted,
                failed: self.failed,
            })
        }
    }
}

/// Writes produced by one `apply`, not yet sent to storage
#[must_use = "position writes are only sent when the batch is persisted"]
pub struct PendingPersist<S: TaskStore + ?Sized> {
    store: Arc<S>,
    writes: Vec<PositionWrite>,
}

impl<S: TaskStore + ?Sized> PendingPersist<S> {
    pub fn writes(&self) -> &[PositionWrite] {
        &self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Send every write concurrently and collect the failures.
    ///
    /// The writes target distinct rows and are independent; a failure does not
    /// stop the others.
    pub async fn persist(self) -> PersistOutcome {
        let results = join_all(self.writes.iter().map(|w| {
            let store = &self.store;
            async move {
                store
                    .update_task_position(&w.task_id, w.status, w.position)
                    .await
                    .map_err(|e| WriteFailure {
                        task_id: w.task_id.to_string(),
                        message: e.to_string(),
                    })
            }
        }))
        .await;

        let failed: Vec<WriteFailure> = results.into_iter().filter_map(|r| r.err()).collect();
        for failure in &failed {
            error!(task = %failure.task_id, error = %failure.message, "position write failed");
        }

        PersistOutcome {
            attempted: self.writes.len(),
            failed,
        }
    }
}

/// One board's task collection and its persistence state
pub struct BoardSession<S: TaskStore + ?Sized> {
    board_id: BoardId,
    tasks: Vec<Task>,
    store: Arc<S>,
    phase: GesturePhase,
    in_flight: usize,
    error: Option<String>,
}

impl<S: TaskStore + ?Sized> BoardSession<S> {
    /// Session over an already fetched collection
    pub fn new(board_id: BoardId, store: Arc<S>, tasks: Vec<Task>) -> Self {
        Self {
            board_id,
            tasks,
            store,
            phase: GesturePhase::Idle,
            in_flight: 0,
            error: None,
        }
    }

    /// Fetch the board's tasks and start a session over them
    pub async fn load(board_id: BoardId, store: Arc<S>) -> Result<Self> {
        let tasks = store.fetch_tasks(&board_id).await?;
        debug!(board = %board_id, tasks = tasks.len(), "loaded board session");
        Ok(Self::new(board_id, store, tasks))
    }

    pub fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn column(&self, status: Status) -> ColumnView<'_> {
        ColumnView::new(&self.tasks, status)
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Batches applied but not yet settled
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// The surfaced error message, if the last failed batch has not been cleared
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        if self.phase == GesturePhase::ErrorSurfaced {
            self.phase = self.resting_phase();
        }
    }

    /// Plan a move against the current collection
    pub fn plan(&self, mv: &MoveRequest) -> Result<ReorderPlan> {
        plan(&self.tasks, mv)
    }

    /// Make `plan` the current collection and return its writes.
    ///
    /// The collection is replaced before anything is sent to storage.
    pub fn apply(&mut self, plan: ReorderPlan) -> PendingPersist<S> {
        self.tasks = plan.tasks;
        if !plan.writes.is_empty() {
            self.in_flight += 1;
            if self.phase == GesturePhase::Idle {
                self.phase = GesturePhase::Persisting;
            }
        }
        PendingPersist {
            store: Arc::clone(&self.store),
            writes: plan.writes,
        }
    }

    /// Record a batch outcome.
    ///
    /// On failure the error message is surfaced and the local collection keeps
    /// the optimistic order.
    pub fn settle(&mut self, outcome: PersistOutcome) -> Result<()> {
        if outcome.attempted > 0 {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        if outcome.is_ok() {
            if self.phase == GesturePhase::Persisting {
                self.phase = self.resting_phase();
            }
            return Ok(());
        }

        error!(
            board = %self.board_id,
            failed = outcome.failed.len(),
            attempted = outcome.attempted,
            "position writes failed; keeping local order"
        );
        self.error = Some(PERSIST_FAILED_MESSAGE.to_string());
        self.phase = GesturePhase::ErrorSurfaced;
        outcome.into_result()
    }

    /// Apply, persist and settle one plan
    pub async fn commit(&mut self, plan: ReorderPlan) -> Result<()> {
        let pending = self.apply(plan);
        if pending.is_empty() {
            return Ok(());
        }
        let outcome = pending.persist().await;
        self.settle(outcome)
    }

    /// Run a whole drag gesture.
    ///
    /// A task missing from the collection is logged and ignored. A rejected
    /// write returns `KanbanError::Persistence` with the move still applied.
    pub async fn handle_drop(&mut self, event: &DropEvent) -> Result<DropOutcome> {
        let Some(mv) = event.to_move()? else {
            debug!(task = %event.draggable_id, "drop changed nothing");
            return Ok(DropOutcome::Unchanged);
        };

        let plan = match self.plan(&mv) {
            Ok(plan) => plan,
            Err(KanbanError::TaskNotFound { id }) => {
                warn!(task = %id, board = %self.board_id, "dropped task is not on the board");
                return Ok(DropOutcome::TaskMissing {
                    task_id: mv.task_id,
                });
            }
            Err(e) => return Err(e),
        };

        if plan.is_noop() {
            return Ok(DropOutcome::Unchanged);
        }

        let writes = plan.writes.clone();
        self.commit(plan).await?;
        info!(
            task = %mv.task_id,
            from = %mv.from_status,
            to = %mv.to_status,
            writes = writes.len(),
            "moved task"
        );
        Ok(DropOutcome::Moved { writes })
    }

    /// Add a task created elsewhere to the collection
    pub fn insert_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Swap in an edited copy of a task
    pub fn replace_task(&mut self, task: Task) -> Result<()> {
        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| KanbanError::TaskNotFound {
                id: task.id.to_string(),
            })?;
        *slot = task;
        Ok(())
    }

    pub fn remove_task(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| &t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Replace the collection with what storage holds and clear any error
    pub async fn reload(&mut self) -> Result<()> {
        self.tasks = self.store.fetch_tasks(&self.board_id).await?;
        self.error = None;
        self.phase = self.resting_phase();
        Ok(())
    }

    fn resting_phase(&self) -> GesturePhase {
        if self.in_flight > 0 {
            GesturePhase::Persisting
        } else {
            GesturePhase::Idle
        }
    }
}
