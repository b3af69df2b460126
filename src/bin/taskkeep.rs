//! Command-line front end for the task tracker.
//!
//! Usage:
//!
//! ```text
//! taskkeep [--config <path>] <command> [args]
//! ```
//!
//! Every invocation loads the configuration, opens the task records in the
//! configured data directory and runs one retention sweep before executing
//! the command. `watch` keeps sweeping on the configured interval until
//! interrupted.

use std::io::{self, Write};
use std::sync::Arc;

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use taskkeep::config::{ConfigError, TrackerConfig};
use taskkeep::task::{
    adapters::fs::FileSnapshotStore,
    domain::{
        DeleteScope, DeletedTask, Priority, Task, TaskFilter, TaskId, TaskQuery, current_date,
    },
    ports::TaskStoreError,
    services::{
        CreateTaskRequest, EditTaskRequest, RetentionSweeper, TaskLifecycleError,
        TaskLifecycleService,
    },
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Service = TaskLifecycleService<FileSnapshotStore, DefaultClock>;

const DEFAULT_CONFIG_PATH: &str = "taskkeep.toml";

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid log filter: {0}")]
    LogFilter(String),

    #[error(transparent)]
    Store(#[from] TaskStoreError),

    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),

    #[error("no active task with id {0}")]
    UnknownTask(TaskId),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("sweeper task failed: {0}")]
    Sweeper(#[from] tokio::task::JoinError),
}

#[derive(Parser)]
#[command(name = "taskkeep", version, about = "Personal task tracker")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: Utf8PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a task
    Add {
        /// Task title
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(short, long)]
        category: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        important: bool,
    },
    /// Change an active task; omitted fields keep their current value
    Edit {
        id: TaskId,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(short, long)]
        category: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        important: Option<bool>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Flip a task between pending and completed
    Toggle { id: TaskId },
    /// Move tasks to the trash
    Delete {
        /// Delete every active task
        #[arg(long, conflicts_with = "ids", required_unless_present = "ids")]
        all: bool,
        ids: Vec<TaskId>,
    },
    /// Bring tasks back from the trash
    Restore {
        #[arg(required = true)]
        ids: Vec<TaskId>,
    },
    /// Erase tasks from the trash immediately
    Purge {
        #[arg(required = true)]
        ids: Vec<TaskId>,
    },
    /// List active tasks
    List {
        #[arg(short, long, default_value_t = TaskFilter::All)]
        filter: TaskFilter,
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// List tasks in the trash
    Trash,
    /// Show completion statistics
    Stats,
    /// Write the filtered view to a JSON file
    Export {
        #[arg(short, long, default_value_t = TaskFilter::All)]
        filter: TaskFilter,
        #[arg(short, long, default_value = "")]
        search: String,
        /// Directory to write the export into
        #[arg(short, long, default_value = ".")]
        out: Utf8PathBuf,
    },
    /// Keep purging expired trash until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config = TrackerConfig::load(&cli.config)?.with_env_overrides()?;
    init_tracing(&config)?;

    let store = FileSnapshotStore::open(&config.data_dir).map_err(CliError::from)?;
    let service = Service::load(Arc::new(store), Arc::new(DefaultClock))
        .await
        .map_err(CliError::from)?;
    service.sweep_expired().await.map_err(CliError::from)?;

    run(cli.command, &service, &config).await?;
    Ok(())
}

fn init_tracing(config: &TrackerConfig) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|err| CliError::LogFilter(err.to_string()))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .try_init()
        .map_err(|err| CliError::LogFilter(err.to_string()))
}

async fn run(command: Command, service: &Service, config: &TrackerConfig) -> Result<(), CliError> {
    let mut out = io::stdout();
    match command {
        Command::Add {
            title,
            description,
            priority,
            category,
            due,
            important,
        } => {
            let mut request = CreateTaskRequest::new(title).with_important(important);
            if let Some(text) = description {
                request = request.with_description(text);
            }
            if let Some(level) = priority {
                request = request.with_priority(level);
            }
            if let Some(name) = category {
                request = request.with_category(name);
            }
            if let Some(date) = due {
                request = request.with_due_date(date);
            }
            let task = service.add_task(request).await?;
            writeln!(out, "created {}", task.id())?;
        }
        Command::Edit {
            id,
            title,
            description,
            priority,
            category,
            due,
            clear_due,
            important,
            completed,
        } => {
            let current = service
                .find_task(id)
                .await
                .ok_or(CliError::UnknownTask(id))?;
            let request = EditRequestBuilder(EditTaskRequest::from_task(&current))
                .apply(title, EditTaskRequest::with_title)
                .apply(description, EditTaskRequest::with_description)
                .apply(priority, EditTaskRequest::with_priority)
                .apply(category, EditTaskRequest::with_category)
                .apply(important, EditTaskRequest::with_important)
                .apply(completed, EditTaskRequest::with_completed)
                .apply(
                    if clear_due { Some(None) } else { due.map(Some) },
                    EditTaskRequest::with_due_date,
                )
                .0;
            let task = service.edit_task(request).await?;
            writeln!(out, "updated {}", task.id())?;
        }
        Command::Toggle { id } => {
            let task = service.toggle_completion(id).await?;
            let state = if task.completed() { "completed" } else { "pending" };
            writeln!(out, "{} is now {state}", task.id())?;
        }
        Command::Delete { all, ids } => {
            let scope = if all {
                DeleteScope::All
            } else {
                DeleteScope::Ids(ids)
            };
            let count = service.soft_delete(scope).await?;
            writeln!(out, "moved {count} task(s) to the trash")?;
        }
        Command::Restore { ids } => {
            let count = service.restore(&ids).await?;
            writeln!(out, "restored {count} task(s)")?;
        }
        Command::Purge { ids } => {
            let count = service.purge_now(&ids).await?;
            writeln!(out, "permanently deleted {count} task(s)")?;
        }
        Command::List { filter, search } => {
            let today = current_date(&DefaultClock);
            for task in service
                .filter(&TaskQuery::new(filter).with_search(search))
                .await
            {
                writeln!(out, "{}", format_task(&task, today))?;
            }
        }
        Command::Trash => {
            let today = current_date(&DefaultClock);
            for deleted in service.deleted_tasks().await {
                writeln!(out, "{}", format_deleted(&deleted, today))?;
            }
        }
        Command::Stats => {
            let stats = service.stats().await;
            writeln!(
                out,
                "total {}  completed {}  pending {}  high {}  progress {}% ({})",
                stats.total,
                stats.completed,
                stats.pending,
                stats.high_priority,
                stats.progress_percent(),
                stats.progress_band().as_str()
            )?;
        }
        Command::Export {
            filter,
            search,
            out: out_dir,
        } => {
            let export = service
                .export(&TaskQuery::new(filter).with_search(search))
                .await?;
            Dir::create_ambient_dir_all(&out_dir, ambient_authority())?;
            let dir = Dir::open_ambient_dir(&out_dir, ambient_authority())?;
            dir.write(export.file_name(), export.contents())?;
            writeln!(
                out,
                "exported {} task(s) to {}",
                export.task_count(),
                out_dir.join(export.file_name())
            )?;
        }
        Command::Watch => watch(service.clone(), config).await?,
    }
    Ok(())
}

async fn watch(service: Service, config: &TrackerConfig) -> Result<(), CliError> {
    let handle = RetentionSweeper::new(service, config.sweep_interval()).spawn();
    tokio::signal::ctrl_c().await?;
    info!("interrupt received, stopping");
    handle.shutdown().await?;
    Ok(())
}

/// Applies optional overrides to an edit request.
struct EditRequestBuilder(EditTaskRequest);

impl EditRequestBuilder {
    fn apply<T>(self, value: Option<T>, set: fn(EditTaskRequest, T) -> EditTaskRequest) -> Self {
        match value {
            Some(inner) => Self(set(self.0, inner)),
            None => self,
        }
    }
}

fn format_task(task: &Task, today: NaiveDate) -> String {
    let mark = if task.completed() { "x" } else { " " };
    let mut parts = vec![format!(
        "{}  [{mark}] {}  ({}, {})",
        task.id(),
        task.title(),
        task.priority(),
        task.category()
    )];
    if let Some(due) = task.due_date() {
        parts.push(format!("due {due}"));
    }
    if task.important() {
        parts.push("!".to_owned());
    }
    if task.is_locked_on(today) {
        parts.push("EXPIRED".to_owned());
    }
    parts.join("  ")
}

fn format_deleted(deleted: &DeletedTask, today: NaiveDate) -> String {
    let expired = if deleted.is_expired_on(today) {
        "  EXPIRED"
    } else {
        ""
    };
    format!(
        "{}  {}  deleted {}  purged after {}{expired}",
        deleted.id(),
        deleted.task().title(),
        deleted.deleted_at().format("%Y-%m-%d %H:%M"),
        deleted.permanent_delete_at().format("%Y-%m-%d %H:%M")
    )
}
