//! tt list command implementation

use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::cli::{format_task_line, load_context, today};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{sort_tasks, DueFilter, ListFilter, Priority, Task};

pub struct ListOptions {
    pub all: bool,
    pub tag: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ListReport {
    total: usize,
    pending: usize,
    done: usize,
    tasks: Vec<Task>,
}

pub fn run(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;

    let filter = ListFilter {
        show_done: options.all,
        tag: options.tag,
        priority: options
            .priority
            .as_deref()
            .map(Priority::from_str)
            .transpose()?,
        due: options
            .due
            .as_deref()
            .map(DueFilter::from_str)
            .transpose()?,
    };

    let today = today();
    let mut tasks = ctx.store.list(&filter, today)?;
    sort_tasks(&mut tasks, today);

    let done = tasks.iter().filter(|task| task.done).count();
    let report = ListReport {
        total: tasks.len(),
        pending: tasks.len() - done,
        done,
        tasks,
    };

    let mut human = HumanOutput::new(format!("tt list: {} task(s)", report.total));
    human.push_summary("pending", report.pending.to_string());
    if options.all {
        human.push_summary("done", report.done.to_string());
    }
    for task in &report.tasks {
        human.push_detail(format_task_line(task));
    }
    if report.total == 0 && !options.all {
        human.push_next_step("tt list --all".to_string());
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &report,
        Some(&human),
    )
}
