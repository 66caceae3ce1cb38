use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use taskboard_kanban::Status;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(version)]
#[command(about = "Three-column task boards with drag-and-drop ordering")]
#[command(long_about = "
taskboard keeps boards of tasks in todo / in_progress / done columns, stored
as JSON files in a .taskboard directory.

Settings are read from ~/.config/taskboard/config.toml, ./taskboard.toml and
TASKBOARD_* environment variables; flags override all of them.

Example usage:
  taskboard init
  taskboard board create Roadmap
  taskboard task add <board> \"Write docs\"
  taskboard task move <board> --task <id> --to in_progress --index 0
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory (default: .taskboard)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Run as this user id
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the store directory
    Init,
    /// Board management
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Show the activity log, newest first
    Activity {
        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Create a board owned by the current user
    Create { name: String },
    /// List boards you own or were invited to
    List,
    /// Give another user access to a board you own
    Share {
        board: String,
        /// User to invite
        #[arg(value_name = "USER")]
        member: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to the end of a column
    Add {
        board: String,
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// todo, in_progress or done
        #[arg(long, default_value = "todo")]
        status: Status,
    },
    /// List a board's tasks by column
    List { board: String },
    /// Edit a task's title or description
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// An empty value clears the description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a task
    Delete { id: String },
    /// Move a task, as if it were dragged and dropped
    Move {
        board: String,
        /// Task to move
        #[arg(long, required_unless_present = "drop", conflicts_with = "drop")]
        task: Option<String>,
        /// Destination column (default: the task's current column)
        #[arg(long)]
        to: Option<Status>,
        /// Destination index in the column (default: the end)
        #[arg(long)]
        index: Option<usize>,
        /// A raw drop event: {"draggableId", "source", "destination"}
        #[arg(long)]
        drop: Option<String>,
    },
}
