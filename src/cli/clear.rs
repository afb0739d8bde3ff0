//! tt clear command implementation

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{ensure_enabled, load_context};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ClearOptions {
    pub done: bool,
    pub force: bool,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ClearReport {
    removed: usize,
    done_only: bool,
}

pub fn run(options: ClearOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    ensure_enabled(ctx.store.storage())?;

    let tasks = ctx.store.get_all()?;
    let candidates = if options.done {
        tasks.iter().filter(|task| task.done).count()
    } else {
        tasks.len()
    };

    let what = if options.done {
        "completed task(s)"
    } else {
        "task(s)"
    };

    if candidates == 0 {
        let report = ClearReport {
            removed: 0,
            done_only: options.done,
        };
        let human = HumanOutput::new(format!("tt clear: no {what} to remove"));
        return emit_success(
            OutputOptions {
                json: options.json,
                quiet: options.quiet,
            },
            "clear",
            &report,
            Some(&human),
        );
    }

    if !options.force {
        return Err(Error::InvalidArgument(format!(
            "refusing to delete {candidates} {what} without --force"
        )));
    }

    let removed = ctx.store.clear(options.done)?;

    let report = ClearReport {
        removed,
        done_only: options.done,
    };

    let human = HumanOutput::new(format!("tt clear: removed {removed} {what}"));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "clear",
        &report,
        Some(&human),
    )
}
