//! tt disable / enable / uninstall command implementations
//!
//! These manage the storage directory itself rather than task records, so
//! they bypass the disabled gate: `enable` has to work while disabled.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::{DisabledMarker, Storage};

pub struct DisableOptions {
    pub reason: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EnableOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct UninstallOptions {
    pub force: bool,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct DisableReport {
    disabled: bool,
    marker: DisabledMarker,
}

#[derive(Serialize)]
struct EnableReport {
    enabled: bool,
    was_disabled: bool,
}

#[derive(Serialize)]
struct UninstallReport {
    removed: bool,
    dir: PathBuf,
}

pub fn run_disable(options: DisableOptions) -> Result<()> {
    // Storage only: these commands must work regardless of config state
    let storage = Storage::resolve(options.dir)?;

    let marker = storage.disable(options.reason)?;

    let mut human = HumanOutput::new("tt disable: mutating commands are now refused");
    human.push_summary("reason", marker.reason.clone());
    human.push_next_step("tt enable");

    let report = DisableReport {
        disabled: true,
        marker,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "disable",
        &report,
        Some(&human),
    )
}

pub fn run_enable(options: EnableOptions) -> Result<()> {
    let storage = Storage::resolve(options.dir)?;

    let was_disabled = storage.enable()?;

    let header = if was_disabled {
        "tt enable: task tracking restored"
    } else {
        "tt enable: already enabled"
    };

    let report = EnableReport {
        enabled: true,
        was_disabled,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "enable",
        &report,
        Some(&HumanOutput::new(header)),
    )
}

pub fn run_uninstall(options: UninstallOptions) -> Result<()> {
    let storage = Storage::resolve(options.dir)?;
    let dir = storage.data_dir().to_path_buf();

    if !options.force {
        return Err(Error::InvalidArgument(format!(
            "refusing to remove {} without --force",
            dir.display()
        )));
    }

    // Best effort: a failure is reported, not raised
    let removed = storage.uninstall();

    let mut human = HumanOutput::new(if removed {
        "tt uninstall: storage removed"
    } else {
        "tt uninstall: storage could not be removed"
    });
    human.push_summary("dir", dir.display().to_string());
    if !removed {
        human.push_warning("some files may remain; remove the directory manually");
    }

    let report = UninstallReport { removed, dir };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "uninstall",
        &report,
        Some(&human),
    )
}
