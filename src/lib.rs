//! tt - Tiny Task Tracker Library
//!
//! This library provides the core functionality for the tt CLI tool: a
//! personal task tracker persisting to a flat JSON document on local disk.
//!
//! # Core Concepts
//!
//! - **Tasks**: to-do items with tags, priority, due dates, and timestamps
//! - **Store**: whole-document read-modify-write over `tasks.json`
//! - **Archive**: a second document receiving completed tasks
//! - **Lifecycle marker**: a sentinel file that pauses mutating commands
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `config.toml`
//! - `error`: error types and result aliases
//! - `export`: JSON/CSV projections of the task list
//! - `lock`: advisory locking and atomic document replacement
//! - `output`: human and JSON output envelopes
//! - `stats`: aggregate statistics over the task list
//! - `storage`: data directory layout and document I/O
//! - `task`: task model, filtering, search, sorting, and the store

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod lock;
pub mod output;
pub mod stats;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
