//! tt stats command implementation

use std::path::PathBuf;

use crate::cli::{load_context, today};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::stats;

pub struct StatsOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: StatsOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;

    let tasks = ctx.store.get_all()?;
    let report = stats::compute(&tasks, today());

    let mut human = HumanOutput::new(format!("tt stats: {} task(s)", report.tasks_total));
    human.push_summary(
        "completed",
        format!("{} ({:.0}%)", report.completed, report.completed_percent),
    );
    human.push_summary("pending", report.pending.to_string());
    human.push_summary("overdue", report.overdue.to_string());
    for entry in &report.pending_by_priority {
        human.push_summary(
            format!("pending {}", entry.priority.as_str()),
            entry.count.to_string(),
        );
    }
    human.push_summary("tags", report.tags_total.to_string());
    for tag in &report.tags {
        human.push_detail(format!("#{tag}"));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "stats",
        &report,
        Some(&human),
    )
}
