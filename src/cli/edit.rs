//! tt edit / tag command implementations

use std::path::PathBuf;
use std::str::FromStr;

use crate::cli::{ensure_enabled, load_context, push_task_summary, validate_due_date};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{EditPatch, Priority};

pub struct EditOptions {
    pub id: u64,
    pub title: Option<String>,
    pub priority: Option<String>,
    pub tags: Vec<String>,
    pub due: Option<String>,
    pub note: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct TagOptions {
    pub id: u64,
    pub tags: Vec<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    ensure_enabled(ctx.store.storage())?;

    if let Some(title) = &options.title {
        if title.trim().is_empty() {
            return Err(Error::InvalidArgument("title cannot be empty".to_string()));
        }
    }

    let patch = EditPatch {
        title: options.title.map(|title| title.trim().to_string()),
        priority: options
            .priority
            .as_deref()
            .map(Priority::from_str)
            .transpose()?,
        tags: if options.tags.is_empty() {
            None
        } else {
            Some(options.tags)
        },
        due_date: options.due.as_deref().map(validate_due_date).transpose()?,
        note: options.note,
    };

    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to edit: pass at least one of --title, --priority, --tag, --due, --note"
                .to_string(),
        ));
    }

    let task = ctx
        .store
        .edit(options.id, patch)?
        .ok_or(Error::TaskNotFound(options.id))?;

    let mut human = HumanOutput::new(format!("tt edit: updated task {}", task.id));
    push_task_summary(&mut human, &task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "edit",
        &task,
        Some(&human),
    )
}

pub fn run_tag(options: TagOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    ensure_enabled(ctx.store.storage())?;

    let task = ctx
        .store
        .update_tags(options.id, options.tags)?
        .ok_or(Error::TaskNotFound(options.id))?;

    let mut human = HumanOutput::new(format!("tt tag: retagged task {}", task.id));
    push_task_summary(&mut human, &task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "tag",
        &task,
        Some(&human),
    )
}
