//! tt archive command implementation

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{ensure_enabled, load_context};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ArchiveOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ArchiveReport {
    archived: usize,
    archive_file: PathBuf,
}

pub fn run(options: ArchiveOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    ensure_enabled(ctx.store.storage())?;

    let archived = ctx.store.archive_completed()?;
    let archive_file = ctx.store.storage().archive_file();

    let header = if archived == 0 {
        "tt archive: nothing to archive".to_string()
    } else {
        format!("tt archive: moved {archived} task(s)")
    };

    let mut human = HumanOutput::new(header);
    if archived > 0 {
        human.push_summary("archive", archive_file.display().to_string());
    }

    let report = ArchiveReport {
        archived,
        archive_file,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "archive",
        &report,
        Some(&human),
    )
}
