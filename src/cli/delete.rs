//! tt delete command implementation

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{ensure_enabled, load_context};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct DeleteOptions {
    pub id: u64,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct DeleteReport {
    id: u64,
    deleted: bool,
}

pub fn run(options: DeleteOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    ensure_enabled(ctx.store.storage())?;

    if !ctx.store.delete(options.id)? {
        return Err(Error::TaskNotFound(options.id));
    }

    let report = DeleteReport {
        id: options.id,
        deleted: true,
    };

    let human = HumanOutput::new(format!("tt delete: removed task {}", options.id));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "delete",
        &report,
        Some(&human),
    )
}
