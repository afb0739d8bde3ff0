//! tt add command implementation

use std::path::PathBuf;
use std::str::FromStr;

use crate::cli::{ensure_enabled, load_context, push_task_summary, validate_due_date};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::Priority;

pub struct AddOptions {
    pub title: String,
    pub tags: Vec<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub note: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: AddOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    ensure_enabled(ctx.store.storage())?;

    let title = options.title.trim();
    if title.is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }

    let priority = options
        .priority
        .as_deref()
        .map(Priority::from_str)
        .transpose()?;
    let due = options
        .due
        .as_deref()
        .map(validate_due_date)
        .transpose()?;

    let task = ctx
        .store
        .add(title.to_string(), options.tags, priority, due, options.note)?;

    let mut human = HumanOutput::new(format!("tt add: created task {}", task.id));
    push_task_summary(&mut human, &task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &task,
        Some(&human),
    )
}
