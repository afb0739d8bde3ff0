//! tt search command implementation

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{format_task_line, load_context};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::Task;

pub struct SearchOptions {
    pub query: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct SearchReport {
    query: String,
    total: usize,
    tasks: Vec<Task>,
}

pub fn run(options: SearchOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;

    let query = options.query.trim();
    if query.is_empty() {
        return Err(Error::InvalidArgument("query cannot be empty".to_string()));
    }

    let tasks = ctx.store.search(query)?;

    let report = SearchReport {
        query: query.to_string(),
        total: tasks.len(),
        tasks,
    };

    let mut human = HumanOutput::new(format!(
        "tt search: {} match(es) for '{}'",
        report.total, report.query
    ));
    for task in &report.tasks {
        human.push_detail(format_task_line(task));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "search",
        &report,
        Some(&human),
    )
}
