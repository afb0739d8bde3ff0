//! tt done / undone command implementations

use std::path::PathBuf;

use crate::cli::{ensure_enabled, load_context, push_task_summary};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ToggleOptions {
    pub id: u64,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_done(options: ToggleOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    ensure_enabled(ctx.store.storage())?;

    let task = ctx
        .store
        .mark_done(options.id)?
        .ok_or(Error::TaskNotFound(options.id))?;

    let mut human = HumanOutput::new(format!("tt done: completed task {}", task.id));
    push_task_summary(&mut human, &task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "done",
        &task,
        Some(&human),
    )
}

pub fn run_undone(options: ToggleOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    ensure_enabled(ctx.store.storage())?;

    let task = ctx
        .store
        .mark_undone(options.id)?
        .ok_or(Error::TaskNotFound(options.id))?;

    let mut human = HumanOutput::new(format!("tt undone: reopened task {}", task.id));
    push_task_summary(&mut human, &task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "undone",
        &task,
        Some(&human),
    )
}
