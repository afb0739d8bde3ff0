//! tt export command implementation

use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::cli::{load_context, today};
use crate::error::Result;
use crate::export::{to_csv, to_json, ExportFormat};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::ListFilter;

pub struct ExportOptions {
    pub format: String,
    pub output: Option<PathBuf>,
    pub all: bool,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ExportReport {
    format: ExportFormat,
    exported: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
}

pub fn run(options: ExportOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let format: ExportFormat = options.format.parse()?;

    let filter = ListFilter {
        show_done: options.all,
        ..ListFilter::default()
    };
    let tasks = ctx.store.list(&filter, today())?;

    if tasks.is_empty() {
        let report = ExportReport {
            format,
            exported: 0,
            path: None,
        };
        let mut human = HumanOutput::new("tt export: no tasks to export");
        if !options.all {
            human.push_next_step("tt export --all");
        }
        return emit_success(
            OutputOptions {
                json: options.json,
                quiet: options.quiet,
            },
            "export",
            &report,
            Some(&human),
        );
    }

    let path = options.output.unwrap_or_else(|| {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("tasks_{stamp}.{}", format.extension()))
    });

    let contents = match format {
        ExportFormat::Json => to_json(&tasks)?,
        ExportFormat::Csv => to_csv(&tasks),
    };
    std::fs::write(&path, contents)?;

    let report = ExportReport {
        format,
        exported: tasks.len(),
        path: Some(path.clone()),
    };

    let mut human = HumanOutput::new(format!("tt export: wrote {} task(s)", tasks.len()));
    human.push_summary("file", path.display().to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "export",
        &report,
        Some(&human),
    )
}
