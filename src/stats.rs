//! Aggregate statistics over the live task set

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::task::{classify_due, DueFilter, Priority, Task};

#[derive(Debug, Clone, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: usize,
}

/// Snapshot of the store, ready for JSON emission or human rendering
#[derive(Debug, Clone, Serialize)]
pub struct TaskStats {
    pub generated_at: DateTime<Utc>,
    pub tasks_total: usize,
    pub completed: usize,
    pub pending: usize,
    pub completed_percent: f64,
    pub overdue: usize,
    pub pending_by_priority: Vec<PriorityCount>,
    pub tags_total: usize,
    pub tags: Vec<String>,
}

/// Compute statistics over the whole live set
///
/// Priority counts cover pending tasks only; the tag census covers every
/// task. An empty store yields zeros throughout.
pub fn compute(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let tasks_total = tasks.len();
    let completed = tasks.iter().filter(|task| task.done).count();
    let pending = tasks_total - completed;

    let completed_percent = if tasks_total == 0 {
        0.0
    } else {
        completed as f64 * 100.0 / tasks_total as f64
    };

    let overdue = tasks
        .iter()
        .filter(|task| classify_due(task, today) == Some(DueFilter::Overdue))
        .count();

    let pending_by_priority = [Priority::High, Priority::Medium, Priority::Low]
        .into_iter()
        .map(|priority| PriorityCount {
            priority,
            count: tasks
                .iter()
                .filter(|task| !task.done && task.priority == priority)
                .count(),
        })
        .collect();

    let tags: Vec<String> = tasks
        .iter()
        .flat_map(|task| task.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    TaskStats {
        generated_at: Utc::now(),
        tasks_total,
        completed,
        pending,
        completed_percent,
        overdue,
        pending_by_priority,
        tags_total: tags.len(),
        tags,
    }
}
