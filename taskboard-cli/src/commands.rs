//! Runs parsed subcommands against the file store

use crate::cli::{BoardCommands, Commands, OutputFormat, TaskCommands};
use crate::config::CliConfig;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use taskboard_kanban::{
    board::{CreateBoard, ListBoards, ShareBoard},
    task::{AddTask, DeleteTask, ListTasks, MoveTask, UpdateTask},
    ActivityLog, BoardId, ColumnView, DropEvent, DropLocation, FileStore, KanbanContext, KanbanError,
    KanbanOperationProcessor, OperationProcessor, Status, TaskId, TaskStore, STORE_DIR,
};
use tracing::debug;

pub async fn run(command: Commands, config: &CliConfig, format: OutputFormat) -> Result<()> {
    let value = match command {
        Commands::Init => init(config).await?,
        Commands::Board { command } => {
            let ctx = open(config)?;
            board(command, &ctx).await?
        }
        Commands::Task { command } => {
            let ctx = open(config)?;
            task(command, &ctx).await?
        }
        Commands::Activity { limit } => {
            let ctx = open(config)?;
            let entries = ctx.store().read_activity(limit).await?;
            serde_json::to_value(entries)?
        }
    };
    print(&value, format)
}

async fn init(config: &CliConfig) -> Result<Value> {
    let store = FileStore::new(&config.data_dir);
    if store.directories_exist() {
        return Err(KanbanError::AlreadyExists {
            path: config.data_dir.clone(),
        }
        .into());
    }
    store.create_directories().await?;
    Ok(json!({ "initialized": store.root() }))
}

/// Use the configured store, or look upward for one if the default is missing
fn open(config: &CliConfig) -> Result<KanbanContext> {
    let store = FileStore::new(&config.data_dir);
    let store = if store.directories_exist() {
        store
    } else if config.data_dir == Path::new(STORE_DIR) {
        let cwd = std::env::current_dir().context("reading current directory")?;
        FileStore::find(cwd)?
    } else {
        return Err(KanbanError::NotInitialized {
            path: config.data_dir.clone(),
        }
        .into());
    };
    debug!(root = %store.root().display(), user = %config.user, "opened store");
    Ok(KanbanContext::new(Arc::new(store), config.user.as_str()))
}

async fn board(command: BoardCommands, ctx: &KanbanContext) -> Result<Value> {
    let processor = KanbanOperationProcessor::new();
    let value = match command {
        BoardCommands::Create { name } => processor.process(&CreateBoard::new(name), ctx).await?,
        BoardCommands::List => processor.process(&ListBoards::new(), ctx).await?,
        BoardCommands::Share { board, member } => {
            processor
                .process(&ShareBoard::new(board.as_str(), member.as_str()), ctx)
                .await?
        }
    };
    Ok(value)
}

async fn task(command: TaskCommands, ctx: &KanbanContext) -> Result<Value> {
    let processor = KanbanOperationProcessor::new();
    let value = match command {
        TaskCommands::Add {
            board,
            title,
            description,
            status,
        } => {
            let mut add = AddTask::new(board.as_str(), title).with_status(status);
            add.description = description;
            processor.process(&add, ctx).await?
        }
        TaskCommands::List { board } => {
            processor
                .process(&ListTasks::new(board.as_str()), ctx)
                .await?
        }
        TaskCommands::Edit {
            id,
            title,
            description,
        } => {
            let mut update = UpdateTask::new(id.as_str());
            update.title = title;
            update.description = description;
            processor.process(&update, ctx).await?
        }
        TaskCommands::Delete { id } => {
            processor
                .process(&DeleteTask::new(id.as_str()), ctx)
                .await?
        }
        TaskCommands::Move {
            board,
            task,
            to,
            index,
            drop,
        } => {
            let board = BoardId::from(board);
            let event = match (drop, task) {
                (Some(payload), _) => {
                    serde_json::from_str(&payload).context("parsing --drop payload")?
                }
                (None, Some(task)) => {
                    drop_event(ctx, &board, TaskId::from(task), to, index).await?
                }
                (None, None) => anyhow::bail!("either --task or --drop is required"),
            };
            processor
                .process(&MoveTask::new(board, event), ctx)
                .await?
        }
    };
    Ok(value)
}

/// Build the drop event a drag of `task` to (`to`, `index`) would produce
async fn drop_event(
    ctx: &KanbanContext,
    board: &BoardId,
    task: TaskId,
    to: Option<Status>,
    index: Option<usize>,
) -> Result<DropEvent> {
    let tasks = ctx.store().fetch_tasks(board).await?;
    let current = tasks
        .iter()
        .find(|t| t.id == task)
        .ok_or_else(|| KanbanError::TaskNotFound {
            id: task.to_string(),
        })?;
    let from = ColumnView::new(&tasks, current.status)
        .index_of(&task)
        .unwrap_or_default();
    let to_status = to.unwrap_or(current.status);

    Ok(DropEvent::new(
        task.clone(),
        DropLocation::in_column(current.status, from),
        DropLocation::in_column(to_status, index.unwrap_or(usize::MAX)),
    ))
}

fn print(value: &Value, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
