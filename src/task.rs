//! Task model and store
//!
//! Tasks live in `tasks.json` as one flat array; completed tasks can be
//! moved to `archive.json`. Every mutation is a whole-document
//! read-modify-write performed under an exclusive file lock, and "not
//! found" is an ordinary `None`/`false` result, never an error.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Task priority, ordered high > medium > low for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::InvalidArgument(format!(
                "invalid priority '{}': must be low, medium, or high",
                s
            ))),
        }
    }
}

fn default_task_priority() -> Priority {
    Priority::Medium
}

/// Due-date window relative to the current calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DueFilter {
    Overdue,
    Today,
    Upcoming,
}

impl FromStr for DueFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overdue" => Ok(DueFilter::Overdue),
            "today" => Ok(DueFilter::Today),
            "upcoming" => Ok(DueFilter::Upcoming),
            _ => Err(Error::InvalidArgument(format!(
                "invalid due filter '{}': must be overdue, today, or upcoming",
                s
            ))),
        }
    }
}

/// A single to-do item
///
/// `due_date` is stored as raw text; the storage layer never validates it.
/// The CLI rejects malformed dates on input, and the filter/sort paths
/// tolerate whatever ends up in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_task_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A task that has been moved out of the live store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedTask {
    #[serde(flatten)]
    pub task: Task,
    pub archived_at: DateTime<Utc>,
}

/// Filters applied by `TaskStore::list`
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Include completed tasks
    pub show_done: bool,
    /// Keep only tasks carrying this tag
    pub tag: Option<String>,
    /// Keep only tasks with this priority
    pub priority: Option<Priority>,
    /// Keep only tasks whose due date falls in this window
    pub due: Option<DueFilter>,
}

/// Partial update for `TaskStore::edit`; `None` fields stay unchanged
#[derive(Debug, Clone, Default)]
pub struct EditPatch {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<String>,
    pub note: Option<String>,
}

impl EditPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.priority.is_none()
            && self.tags.is_none()
            && self.due_date.is_none()
            && self.note.is_none()
    }
}

/// Durable CRUD over the task list
#[derive(Debug, Clone)]
pub struct TaskStore {
    storage: Storage,
    config: Config,
}

impl TaskStore {
    pub fn new(storage: Storage, config: Config) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Create a task with a freshly assigned id and persist it
    pub fn add(
        &self,
        title: String,
        tags: Vec<String>,
        priority: Option<Priority>,
        due_date: Option<String>,
        note: Option<String>,
    ) -> Result<Task> {
        let _guard = self.storage.lock_tasks()?;
        let mut tasks = self.storage.read_tasks()?;

        let task = Task {
            id: next_id(&tasks),
            title,
            done: false,
            tags,
            priority: priority.unwrap_or(self.config.default_priority),
            due_date,
            note,
            created_at: Utc::now(),
            completed_at: None,
        };

        tasks.push(task.clone());
        self.storage.write_tasks(&tasks)?;
        Ok(task)
    }

    /// Read the live set with filters applied; store order is preserved
    pub fn list(&self, filter: &ListFilter, today: NaiveDate) -> Result<Vec<Task>> {
        let mut tasks = self.storage.read_tasks()?;

        if !filter.show_done {
            tasks.retain(|task| !task.done);
        }
        if let Some(tag) = &filter.tag {
            tasks.retain(|task| task.tags.iter().any(|t| t == tag));
        }
        if let Some(priority) = filter.priority {
            tasks.retain(|task| task.priority == priority);
        }
        if let Some(due) = filter.due {
            // A due filter drops tasks without a parseable date
            tasks.retain(|task| classify_due(task, today) == Some(due));
        }

        Ok(tasks)
    }

    /// The whole live document, completed tasks included
    pub fn get_all(&self) -> Result<Vec<Task>> {
        self.storage.read_tasks()
    }

    /// Mark a task completed; `None` when the id is absent
    pub fn mark_done(&self, id: u64) -> Result<Option<Task>> {
        self.update_task(id, |task| {
            task.done = true;
            task.completed_at = Some(Utc::now());
        })
    }

    /// Reopen a completed task; `None` when the id is absent
    pub fn mark_undone(&self, id: u64) -> Result<Option<Task>> {
        self.update_task(id, |task| {
            task.done = false;
            task.completed_at = None;
        })
    }

    /// Remove one task; `false` when the id is absent
    pub fn delete(&self, id: u64) -> Result<bool> {
        let _guard = self.storage.lock_tasks()?;
        let mut tasks = self.storage.read_tasks()?;

        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Ok(false);
        }

        self.storage.write_tasks(&tasks)?;
        Ok(true)
    }

    /// Replace the tag list of a task
    pub fn update_tags(&self, id: u64, tags: Vec<String>) -> Result<Option<Task>> {
        self.update_task(id, |task| task.tags = tags)
    }

    /// Apply a partial update; unspecified fields stay as they are
    pub fn edit(&self, id: u64, patch: EditPatch) -> Result<Option<Task>> {
        self.update_task(id, |task| {
            if let Some(title) = patch.title {
                task.title = title;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(tags) = patch.tags {
                task.tags = tags;
            }
            if let Some(due_date) = patch.due_date {
                task.due_date = Some(due_date);
            }
            if let Some(note) = patch.note {
                task.note = Some(note);
            }
        })
    }

    /// Case-insensitive substring search over titles, then notes
    ///
    /// Store order is preserved and a task matching both fields appears
    /// exactly once.
    pub fn search(&self, query: &str) -> Result<Vec<Task>> {
        let tasks = self.storage.read_tasks()?;
        let needle = query.to_lowercase();

        Ok(tasks
            .into_iter()
            .filter(|task| {
                task.title.to_lowercase().contains(&needle)
                    || task
                        .note
                        .as_deref()
                        .is_some_and(|note| note.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Move completed tasks to the archive document
    ///
    /// Partitions the live set, stamps the completed half with
    /// `archived_at`, appends to the archive, and rewrites the live file
    /// with pending tasks only. Returns the number of tasks moved.
    pub fn archive_completed(&self) -> Result<usize> {
        let _guard = self.storage.lock_tasks()?;
        let tasks = self.storage.read_tasks()?;

        let (completed, pending): (Vec<Task>, Vec<Task>) =
            tasks.into_iter().partition(|task| task.done);
        if completed.is_empty() {
            return Ok(0);
        }

        let archived_at = Utc::now();
        let moved = completed.len();

        let mut archive = self.storage.read_archive()?;
        archive.extend(
            completed
                .into_iter()
                .map(|task| ArchivedTask { task, archived_at }),
        );

        self.storage.write_archive(&archive)?;
        self.storage.write_tasks(&pending)?;
        Ok(moved)
    }

    /// Bulk-delete tasks; all of them, or only the completed ones
    pub fn clear(&self, done_only: bool) -> Result<usize> {
        let _guard = self.storage.lock_tasks()?;
        let mut tasks = self.storage.read_tasks()?;

        let before = tasks.len();
        if done_only {
            tasks.retain(|task| !task.done);
        } else {
            tasks.clear();
        }

        let removed = before - tasks.len();
        if removed > 0 {
            self.storage.write_tasks(&tasks)?;
        }
        Ok(removed)
    }

    fn update_task<F>(&self, id: u64, mutate: F) -> Result<Option<Task>>
    where
        F: FnOnce(&mut Task),
    {
        let _guard = self.storage.lock_tasks()?;
        let mut tasks = self.storage.read_tasks()?;

        let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };

        mutate(task);
        let updated = task.clone();
        self.storage.write_tasks(&tasks)?;
        Ok(Some(updated))
    }
}

fn next_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1
}

/// Classify a task's due date against `today`
///
/// Missing or unparseable dates yield `None`. A completed task is never
/// overdue.
pub fn classify_due(task: &Task, today: NaiveDate) -> Option<DueFilter> {
    let date = parse_due_date(task.due_date.as_deref()?)?;
    if date < today {
        if task.done {
            None
        } else {
            Some(DueFilter::Overdue)
        }
    } else if date == today {
        Some(DueFilter::Today)
    } else {
        Some(DueFilter::Upcoming)
    }
}

/// Parse an ISO calendar date, tolerating surrounding whitespace
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Sort tasks for display
///
/// Overdue pending work first, then ascending due date (tasks without a
/// usable date last), then priority high before medium before low. The id
/// tiebreak makes the order independent of storage order.
pub fn sort_tasks(tasks: &mut [Task], today: NaiveDate) {
    tasks.sort_by(|left, right| {
        overdue_rank(left, today)
            .cmp(&overdue_rank(right, today))
            .then_with(|| due_key(left).cmp(&due_key(right)))
            .then_with(|| priority_rank(left.priority).cmp(&priority_rank(right.priority)))
            .then_with(|| left.id.cmp(&right.id))
    });
}

fn overdue_rank(task: &Task, today: NaiveDate) -> usize {
    if classify_due(task, today) == Some(DueFilter::Overdue) {
        0
    } else {
        1
    }
}

fn due_key(task: &Task) -> NaiveDate {
    task.due_date
        .as_deref()
        .and_then(parse_due_date)
        .unwrap_or(NaiveDate::MAX)
}

fn priority_rank(priority: Priority) -> usize {
    match priority {
        Priority::High => 0,
        Priority::Medium => 1,
        Priority::Low => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, TaskStore) {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf());
        let store = TaskStore::new(storage, Config::default());
        (temp, store)
    }

    fn add_titled(store: &TaskStore, title: &str) -> Task {
        store
            .add(title.to_string(), Vec::new(), None, None, None)
            .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let (_temp, store) = test_store();

        let first = add_titled(&store, "first");
        let second = add_titled(&store, "second");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        // Deleting the top id frees it for reuse: next id is max + 1
        assert!(store.delete(2).unwrap());
        let third = add_titled(&store, "third");
        assert_eq!(third.id, 2);
    }

    #[test]
    fn add_sets_defaults() {
        let (_temp, store) = test_store();

        let task = store
            .add("Buy milk".to_string(), Vec::new(), Some(Priority::High), None, None)
            .unwrap();
        assert_eq!(task.id, 1);
        assert!(!task.done);
        assert_eq!(task.priority, Priority::High);
        assert!(task.tags.is_empty());
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn add_then_delete_restores_prior_state() {
        let (_temp, store) = test_store();
        add_titled(&store, "keeper");

        let before = store.get_all().unwrap();
        let added = add_titled(&store, "transient");
        assert!(store.delete(added.id).unwrap());

        assert_eq!(store.get_all().unwrap(), before);
    }

    #[test]
    fn done_then_undone_clears_completion() {
        let (_temp, store) = test_store();
        let task = add_titled(&store, "toggle me");

        let done = store.mark_done(task.id).unwrap().unwrap();
        assert!(done.done);
        assert!(done.completed_at.is_some());

        let undone = store.mark_undone(task.id).unwrap().unwrap();
        assert!(!undone.done);
        assert!(undone.completed_at.is_none());
    }

    #[test]
    fn mark_done_missing_id_is_none() {
        let (_temp, store) = test_store();
        assert!(store.mark_done(99).unwrap().is_none());
        assert!(!store.delete(99).unwrap());
    }

    #[test]
    fn list_excludes_done_unless_asked() {
        let (_temp, store) = test_store();
        let task = add_titled(&store, "done one");
        add_titled(&store, "pending one");
        store.mark_done(task.id).unwrap();

        let pending = store.list(&ListFilter::default(), today()).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "pending one");

        let all = store
            .list(
                &ListFilter {
                    show_done: true,
                    ..ListFilter::default()
                },
                today(),
            )
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn list_filters_by_tag_and_priority() {
        let (_temp, store) = test_store();
        store
            .add(
                "work item".to_string(),
                vec!["work".to_string()],
                Some(Priority::High),
                None,
                None,
            )
            .unwrap();
        store
            .add(
                "home item".to_string(),
                vec!["home".to_string()],
                Some(Priority::Low),
                None,
                None,
            )
            .unwrap();

        let tagged = store
            .list(
                &ListFilter {
                    tag: Some("work".to_string()),
                    ..ListFilter::default()
                },
                today(),
            )
            .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].title, "work item");

        let high = store
            .list(
                &ListFilter {
                    priority: Some(Priority::High),
                    ..ListFilter::default()
                },
                today(),
            )
            .unwrap();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].title, "work item");
    }

    #[test]
    fn due_filter_drops_unusable_dates_and_done_overdue() {
        let (_temp, store) = test_store();
        store
            .add(
                "past".to_string(),
                Vec::new(),
                None,
                Some("2024-06-01".to_string()),
                None,
            )
            .unwrap();
        let done_past = store
            .add(
                "done past".to_string(),
                Vec::new(),
                None,
                Some("2024-06-01".to_string()),
                None,
            )
            .unwrap();
        store.mark_done(done_past.id).unwrap();
        store
            .add(
                "garbled".to_string(),
                Vec::new(),
                None,
                Some("not-a-date".to_string()),
                None,
            )
            .unwrap();
        store.add("undated".to_string(), Vec::new(), None, None, None).unwrap();
        store
            .add(
                "future".to_string(),
                Vec::new(),
                None,
                Some("2024-07-01".to_string()),
                None,
            )
            .unwrap();

        let overdue = store
            .list(
                &ListFilter {
                    show_done: true,
                    due: Some(DueFilter::Overdue),
                    ..ListFilter::default()
                },
                today(),
            )
            .unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].title, "past");

        let upcoming = store
            .list(
                &ListFilter {
                    due: Some(DueFilter::Upcoming),
                    ..ListFilter::default()
                },
                today(),
            )
            .unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].title, "future");
    }

    #[test]
    fn due_today_matches_exact_date() {
        let (_temp, store) = test_store();
        store
            .add(
                "today task".to_string(),
                Vec::new(),
                None,
                Some("2024-06-15".to_string()),
                None,
            )
            .unwrap();

        let hits = store
            .list(
                &ListFilter {
                    due: Some(DueFilter::Today),
                    ..ListFilter::default()
                },
                today(),
            )
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn search_is_case_insensitive_and_deduplicated() {
        let (_temp, store) = test_store();
        store
            .add(
                "Buy MILK".to_string(),
                Vec::new(),
                None,
                None,
                Some("milk from the corner shop".to_string()),
            )
            .unwrap();
        add_titled(&store, "unrelated");

        let hits = store.search("milk").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Buy MILK");
    }

    #[test]
    fn search_reaches_notes() {
        let (_temp, store) = test_store();
        store
            .add(
                "opaque title".to_string(),
                Vec::new(),
                None,
                None,
                Some("remember the deadline".to_string()),
            )
            .unwrap();

        let hits = store.search("DEADLINE").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn edit_applies_subset_only() {
        let (_temp, store) = test_store();
        let task = store
            .add(
                "old title".to_string(),
                vec!["keep".to_string()],
                Some(Priority::Low),
                None,
                None,
            )
            .unwrap();

        let updated = store
            .edit(
                task.id,
                EditPatch {
                    title: Some("new title".to_string()),
                    ..EditPatch::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "new title");
        assert_eq!(updated.priority, Priority::Low);
        assert_eq!(updated.tags, vec!["keep".to_string()]);
    }

    #[test]
    fn edit_missing_id_leaves_store_unchanged() {
        let (_temp, store) = test_store();
        add_titled(&store, "only task");
        let before = store.get_all().unwrap();

        let result = store
            .edit(
                2,
                EditPatch {
                    title: Some("New title".to_string()),
                    ..EditPatch::default()
                },
            )
            .unwrap();

        assert!(result.is_none());
        assert_eq!(store.get_all().unwrap(), before);
    }

    #[test]
    fn archive_partitions_live_set() {
        let (_temp, store) = test_store();
        let done_task = add_titled(&store, "done");
        add_titled(&store, "pending");
        store.mark_done(done_task.id).unwrap();

        let moved = store.archive_completed().unwrap();
        assert_eq!(moved, 1);

        let live = store.get_all().unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].title, "pending");

        let archive = store.storage().read_archive().unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].task.id, done_task.id);
    }

    #[test]
    fn archive_appends_to_prior_archive() {
        let (_temp, store) = test_store();
        let first = add_titled(&store, "first");
        store.mark_done(first.id).unwrap();
        assert_eq!(store.archive_completed().unwrap(), 1);

        let second = add_titled(&store, "second");
        store.mark_done(second.id).unwrap();
        assert_eq!(store.archive_completed().unwrap(), 1);

        let archive = store.storage().read_archive().unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn archive_with_nothing_done_is_a_noop() {
        let (_temp, store) = test_store();
        add_titled(&store, "pending");
        assert_eq!(store.archive_completed().unwrap(), 0);
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn clear_done_only_keeps_pending() {
        let (_temp, store) = test_store();
        let done_task = add_titled(&store, "done");
        add_titled(&store, "pending");
        store.mark_done(done_task.id).unwrap();

        assert_eq!(store.clear(true).unwrap(), 1);
        let remaining = store.get_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "pending");

        assert_eq!(store.clear(false).unwrap(), 1);
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn sort_puts_overdue_first_then_date_then_priority() {
        let mk = |id: u64, due: Option<&str>, priority: Priority, done: bool| Task {
            id,
            title: format!("task {id}"),
            done,
            tags: Vec::new(),
            priority,
            due_date: due.map(str::to_string),
            note: None,
            created_at: Utc::now(),
            completed_at: None,
        };

        let mut tasks = vec![
            mk(1, None, Priority::High, false),
            mk(2, Some("2024-07-01"), Priority::Low, false),
            mk(3, Some("2024-06-01"), Priority::Low, false),
            mk(4, Some("2024-06-01"), Priority::High, true),
            mk(5, Some("2024-07-01"), Priority::High, false),
            mk(6, Some("junk"), Priority::Medium, false),
        ];

        sort_tasks(&mut tasks, today());
        let order: Vec<u64> = tasks.iter().map(|task| task.id).collect();

        // 3 is the only pending overdue task; 4 shares its date but is done,
        // so it sorts by date alone; unusable dates (1, 6) go last by
        // priority.
        assert_eq!(order, vec![3, 4, 5, 2, 1, 6]);
    }

    #[test]
    fn priority_round_trip_via_str() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
