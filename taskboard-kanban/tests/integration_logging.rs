//! Integration tests for activity logging

use std::sync::Arc;
use taskboard_kanban::{
    board::{CreateBoard, ListBoards, ShareBoard},
    task::{AddTask, DeleteTask, ListTasks, MoveTask, UpdateTask},
    ActivityLog, DropEvent, DropLocation, FileStore, KanbanContext, KanbanOperationProcessor,
    OperationProcessor, Status,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_activity_logging_end_to_end() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileStore::init(temp.path()).await.unwrap());
    let ctx = KanbanContext::new(store.clone(), "alice");
    let processor = KanbanOperationProcessor::with_actor("alice[cli]");

    let board = processor
        .process(&CreateBoard::new("Launch"), &ctx)
        .await
        .unwrap();
    let board_id = board["id"].as_str().unwrap().to_string();

    let task = processor
        .process(&AddTask::new(board_id.as_str(), "Press release"), &ctx)
        .await
        .unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    processor
        .process(
            &UpdateTask::new(task_id.as_str()).with_title("Press kit"),
            &ctx,
        )
        .await
        .unwrap();

    let drop = DropEvent::new(
        task_id.as_str(),
        DropLocation::in_column(Status::Todo, 0),
        DropLocation::in_column(Status::InProgress, 0),
    );
    processor
        .process(&MoveTask::new(board_id.as_str(), drop), &ctx)
        .await
        .unwrap();

    // Reads are not logged
    processor.process(&ListBoards::new(), &ctx).await.unwrap();
    let listed = processor
        .process(&ListTasks::new(board_id.as_str()), &ctx)
        .await
        .unwrap();
    assert_eq!(listed["columns"][1]["tasks"][0]["title"], "Press kit");

    processor
        .process(&DeleteTask::new(task_id.as_str()), &ctx)
        .await
        .unwrap();

    let entries = store.read_activity(None).await.unwrap();
    let ops: Vec<&str> = entries.iter().map(|e| e.op.as_str()).collect();
    assert_eq!(
        ops,
        [
            "delete task",
            "move task",
            "update task",
            "add task",
            "create board"
        ]
    );
    assert!(entries
        .iter()
        .all(|e| e.actor.as_deref() == Some("alice[cli]")));

    let activity_path = store.root().join("activity").join("current.jsonl");
    assert!(
        activity_path.exists(),
        "Activity log file should exist at {:?}",
        activity_path
    );
    let lines = std::fs::read_to_string(&activity_path).unwrap();
    assert_eq!(lines.lines().count(), 5);
}

#[tokio::test]
async fn test_rejected_operations_are_not_logged() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileStore::init(temp.path()).await.unwrap());
    let alice = KanbanContext::new(store.clone(), "alice");
    let mallory = KanbanContext::new(store.clone(), "mallory");
    let processor = KanbanOperationProcessor::new();

    let board = processor
        .process(&CreateBoard::new("Private"), &alice)
        .await
        .unwrap();
    let board_id = board["id"].as_str().unwrap();

    let result = processor
        .process(&AddTask::new(board_id, "sneaky"), &mallory)
        .await;
    assert!(result.is_err());

    let result = processor
        .process(&ShareBoard::new(board_id, "mallory"), &mallory)
        .await;
    assert!(result.is_err());

    let entries = store.read_activity(None).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].op, "create board");
    assert_eq!(entries[0].actor.as_deref(), Some("alice"));
}
