//! Command output for tt
//!
//! Every command emits either a human-readable block or, with `--json`,
//! a versioned envelope that scripts can parse without scraping text.
//! Success and error envelopes share one shape: `schema_version`,
//! `command`, `status`, then `data` or `error`.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

pub const SCHEMA_VERSION: &str = "tt.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// One JSON document per invocation, success or failure
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    next_steps: Vec<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// Accumulator for the human-readable form of a command result
///
/// Rendered as a header line followed by optional Summary, Details,
/// Warnings and Next steps sections. The warning and next-step entries
/// also ride along in the JSON envelope.
#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

impl fmt::Display for HumanOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;

        if !self.summary.is_empty() {
            write!(f, "\n\nSummary:")?;
            for (key, value) in &self.summary {
                if value.is_empty() {
                    write!(f, "\n- {key}")?;
                } else {
                    write!(f, "\n- {key}: {value}")?;
                }
            }
        }

        for (title, items) in [
            ("Details", &self.details),
            ("Warnings", &self.warnings),
            ("Next steps", &self.next_steps),
        ] {
            if items.is_empty() {
                continue;
            }
            write!(f, "\n\n{title}:")?;
            for item in items {
                write!(f, "\n- {item}")?;
            }
        }

        Ok(())
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let envelope = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data: Some(data),
            error: None,
            warnings: human.map(|h| h.warnings.clone()).unwrap_or_default(),
            next_steps: human.map(|h| h.next_steps.clone()).unwrap_or_default(),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{human}");
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);

    if json {
        let envelope: Envelope<'_, ()> = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            data: None,
            error: Some(ErrorBody {
                message: err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            }),
            warnings: Vec::new(),
            next_steps,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Best-effort command name for error envelopes, read straight from
/// argv (the parsed Cli may not exist yet when parsing itself fails)
pub fn infer_command_name_from_args() -> String {
    std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with('-'))
        .unwrap_or_else(|| "tt".to_string())
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        3 => "disabled",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::Disabled(_) => vec!["tt enable".to_string()],
        Error::TaskNotFound(_) => vec!["tt list --all".to_string()],
        Error::InvalidConfig(_) => vec!["fix config.toml then retry".to_string()],
        Error::NoDataDir => vec!["pass --dir <path> or set TT_DIR".to_string()],
        _ => Vec::new(),
    }
}
