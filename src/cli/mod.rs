//! Command-line interface for tt
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::HumanOutput;
use crate::storage::Storage;
use crate::task::{Task, TaskStore};

mod add;
mod archive;
mod clear;
mod delete;
mod done;
mod edit;
mod export;
mod lifecycle;
mod list;
mod search;
mod stats;

/// tt - tiny task tracker
///
/// A personal task CLI: add, list, filter, complete, archive and export
/// tasks kept in a flat JSON file.
#[derive(Parser, Debug)]
#[command(name = "tt")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Storage directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TT_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Tags for the task (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Priority: low, medium, or high
        #[arg(short, long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },

    /// List tasks with optional filtering
    List {
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,

        /// Only tasks carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only tasks with this priority
        #[arg(short, long)]
        priority: Option<String>,

        /// Due-date window: overdue, today, or upcoming
        #[arg(long)]
        due: Option<String>,
    },

    /// Mark a task as completed
    Done {
        /// Task id
        id: u64,
    },

    /// Reopen a completed task
    Undone {
        /// Task id
        id: u64,
    },

    /// Delete a task permanently
    Delete {
        /// Task id
        id: u64,
    },

    /// Replace the tags of a task
    Tag {
        /// Task id
        id: u64,

        /// New tags (replace the existing set)
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Edit task fields in place
    Edit {
        /// Task id
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New priority: low, medium, or high
        #[arg(short, long)]
        priority: Option<String>,

        /// New tags (repeatable, replace the existing set)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// New note
        #[arg(long)]
        note: Option<String>,
    },

    /// Search task titles and notes
    Search {
        /// Case-insensitive substring to look for
        query: String,
    },

    /// Move completed tasks to the archive
    Archive,

    /// Export tasks to a file
    Export {
        /// Export format: json or csv
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path (default: tasks_<timestamp>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
    },

    /// Bulk-delete tasks
    Clear {
        /// Only completed tasks
        #[arg(short, long)]
        done: bool,

        /// Skip the safety check
        #[arg(short, long)]
        force: bool,
    },

    /// Show task statistics
    Stats,

    /// Refuse further mutating commands
    Disable {
        /// Reason recorded in the marker file
        #[arg(long)]
        reason: Option<String>,
    },

    /// Lift a previous disable
    Enable,

    /// Remove the storage directory entirely
    Uninstall {
        /// Skip the safety check
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Add {
                title,
                tags,
                priority,
                due,
                note,
            } => add::run(add::AddOptions {
                title,
                tags,
                priority,
                due,
                note,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::List {
                all,
                tag,
                priority,
                due,
            } => list::run(list::ListOptions {
                all,
                tag,
                priority,
                due,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Done { id } => done::run_done(done::ToggleOptions {
                id,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Undone { id } => done::run_undone(done::ToggleOptions {
                id,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Delete { id } => delete::run(delete::DeleteOptions {
                id,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Tag { id, tags } => edit::run_tag(edit::TagOptions {
                id,
                tags,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Edit {
                id,
                title,
                priority,
                tags,
                due,
                note,
            } => edit::run_edit(edit::EditOptions {
                id,
                title,
                priority,
                tags,
                due,
                note,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Search { query } => search::run(search::SearchOptions {
                query,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Archive => archive::run(archive::ArchiveOptions {
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Export {
                format,
                output,
                all,
            } => export::run(export::ExportOptions {
                format,
                output,
                all,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Clear { done, force } => clear::run(clear::ClearOptions {
                done,
                force,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Stats => stats::run(stats::StatsOptions {
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Disable { reason } => lifecycle::run_disable(lifecycle::DisableOptions {
                reason,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Enable => lifecycle::run_enable(lifecycle::EnableOptions {
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Uninstall { force } => {
                lifecycle::run_uninstall(lifecycle::UninstallOptions {
                    force,
                    dir: self.dir,
                    json: self.json,
                    quiet: self.quiet,
                })
            }
        }
    }
}

/// Shared per-command context: resolved storage plus loaded config
pub(crate) struct Context {
    pub store: TaskStore,
}

pub(crate) fn load_context(dir: Option<PathBuf>) -> Result<Context> {
    let storage = Storage::resolve(dir)?;
    let config = Config::load_from_dir(storage.data_dir())?;
    Ok(Context {
        store: TaskStore::new(storage, config),
    })
}

/// Mutating commands are refused while the disabled sentinel is present
pub(crate) fn ensure_enabled(storage: &Storage) -> Result<()> {
    if storage.is_disabled() {
        return Err(Error::Disabled(storage.disabled_reason()));
    }
    Ok(())
}

/// Validate a `YYYY-MM-DD` due date before it reaches the store
pub(crate) fn validate_due_date(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        Error::InvalidArgument(format!("invalid due date '{raw}': expected YYYY-MM-DD"))
    })?;
    Ok(trimmed.to_string())
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Standard one-task summary for human output
pub(crate) fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("id", task.id.to_string());
    human.push_summary("title", task.title.clone());
    human.push_summary(
        "status",
        if task.done { "done" } else { "pending" }.to_string(),
    );
    human.push_summary("priority", task.priority.as_str().to_string());
    if !task.tags.is_empty() {
        human.push_summary("tags", task.tags.join(", "));
    }
    if let Some(due) = &task.due_date {
        human.push_summary("due", due.clone());
    }
    if let Some(note) = &task.note {
        human.push_summary("note", note.clone());
    }
}

/// One-line task rendering for list and search output
pub(crate) fn format_task_line(task: &Task) -> String {
    let marker = if task.done { "x" } else { " " };
    let mut line = format!(
        "{:>4} [{marker}] {:<6} {}",
        task.id,
        task.priority.as_str(),
        task.title
    );
    if !task.tags.is_empty() {
        line.push_str(&format!("  #{}", task.tags.join(" #")));
    }
    if let Some(due) = &task.due_date {
        line.push_str(&format!("  (due {due})"));
    }
    line
}
