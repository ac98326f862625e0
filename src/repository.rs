//! Task collection operations and related utility functions.
//!
//! This module provides the `TaskRepository`, the ordered (newest first)
//! in-memory task collection, along with query filters, task reference
//! resolution, tag normalisation and due-date parsing.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, TickitError};
use crate::fields::*;
use crate::task::{SubTask, Task, TaskDraft, TaskPatch};

/// Filters for `TaskRepository::query`. `None` on a dimension matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    /// Case-insensitive substring matched against title, description and category.
    pub text: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub due: Option<DueWindow>,
}

impl TaskQuery {
    /// Query matching every task.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        let needle = self.text.trim().to_lowercase();
        if !needle.is_empty()
            && !task.title.to_lowercase().contains(&needle)
            && !task.description.to_lowercase().contains(&needle)
            && !task.category.to_lowercase().contains(&needle)
        {
            return false;
        }
        if let Some(s) = self.status {
            if task.status != s {
                return false;
            }
        }
        if let Some(p) = self.priority {
            if task.priority != p {
                return false;
            }
        }
        if let Some(window) = self.due {
            let (week_start, week_end) = start_end_of_this_week(today);
            let d = task.due_date;
            let ok = match window {
                DueWindow::Today => d == today,
                DueWindow::ThisWeek => d >= week_start && d <= week_end,
                DueWindow::Overdue => d < today && !task.is_completed(),
            };
            if !ok {
                return false;
            }
        }
        true
    }
}

/// Outcome of a successful `TaskRepository::update`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChange {
    /// The task after the merge.
    pub task: Task,
    pub previous_status: Status,
    /// XP to credit, present only on the first completion of the task.
    pub reward: Option<u32>,
}

impl TaskChange {
    /// The merge moved the task into COMPLETED.
    pub fn completed_now(&self) -> bool {
        self.previous_status != Status::Completed && self.task.status == Status::Completed
    }
}

/// Ordered task collection, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRepository {
    tasks: Vec<Task>,
}

impl TaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        TaskRepository { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by ID.
    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TickitError::TaskNotFound(id.to_string()))
    }

    /// Create a task from `draft` and place it first.
    pub fn create(&mut self, draft: TaskDraft, today: NaiveDate, now: DateTime<Utc>) -> &Task {
        let task = Task::from_draft(draft, today, now);
        debug!(id = %task.id, title = %task.title, "created task");
        self.tasks.insert(0, task);
        &self.tasks[0]
    }

    /// Merge `patch` into the task with `id`.
    ///
    /// Entering COMPLETED for the first time marks the task rewarded and
    /// reports its (pre-merge) `xp_value` in `TaskChange::reward`.
    pub fn update(&mut self, id: Uuid, patch: TaskPatch, now: DateTime<Utc>) -> Result<TaskChange> {
        let task = self.get_mut(id)?;
        let xp_value = task.xp_value;
        let previous_status = task.apply(patch, now);

        let entered = previous_status != Status::Completed && task.status == Status::Completed;
        let reward = if entered && !task.xp_awarded {
            task.xp_awarded = true;
            Some(xp_value)
        } else {
            None
        };
        debug!(%id, ?previous_status, status = ?task.status, ?reward, "updated task");
        Ok(TaskChange {
            task: task.clone(),
            previous_status,
            reward,
        })
    }

    /// Allow the task's XP to be granted again on its next completion.
    pub fn reset_reward(&mut self, id: Uuid) -> Result<()> {
        self.get_mut(id)?.xp_awarded = false;
        Ok(())
    }

    /// Remove the task with `id`, returning it.
    pub fn delete(&mut self, id: Uuid) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TickitError::TaskNotFound(id.to_string()))?;
        Ok(self.tasks.remove(idx))
    }

    /// Tasks matching every filter in `query`, in collection order.
    pub fn query(&self, query: &TaskQuery, today: NaiveDate) -> Vec<&Task> {
        self.tasks.iter().filter(|t| query.matches(t, today)).collect()
    }

    /// Append a new incomplete subtask.
    pub fn add_subtask(&mut self, id: Uuid, title: &str) -> Result<SubTask> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TickitError::InvalidInput("subtask title cannot be empty".into()));
        }
        let sub = SubTask::new(title);
        self.get_mut(id)?.subtasks.push(sub.clone());
        Ok(sub)
    }

    /// Flip the completion flag of the subtask at `index` (0-based).
    pub fn toggle_subtask(&mut self, id: Uuid, index: usize) -> Result<SubTask> {
        let task = self.get_mut(id)?;
        let count = task.subtasks.len();
        let sub = task.subtasks.get_mut(index).ok_or_else(|| {
            TickitError::InvalidInput(format!(
                "task has {count} subtask(s), no subtask #{}",
                index + 1
            ))
        })?;
        sub.is_completed = !sub.is_completed;
        Ok(sub.clone())
    }

    /// Resolve a task reference: full id, unique id prefix, or exact title
    /// (case-insensitive).
    pub fn resolve(&self, reference: &str) -> Result<Uuid> {
        let reference = reference.trim();
        if let Ok(id) = Uuid::parse_str(reference) {
            return self
                .get(id)
                .map(|t| t.id)
                .ok_or_else(|| TickitError::TaskNotFound(reference.to_string()));
        }

        let lower = reference.to_lowercase();
        let looks_like_id =
            lower.len() >= 4 && lower.chars().all(|c| c.is_ascii_hexdigit() || c == '-');
        let by_prefix: Vec<&Task> = if looks_like_id {
            self.tasks.iter().filter(|t| t.id.to_string().starts_with(&lower)).collect()
        } else {
            Vec::new()
        };
        let matches = if by_prefix.is_empty() {
            self.tasks.iter().filter(|t| t.title.to_lowercase() == lower).collect()
        } else {
            by_prefix
        };

        match matches.len() {
            0 => Err(TickitError::TaskNotFound(reference.to_string())),
            1 => Ok(matches[0].id),
            count => Err(TickitError::AmbiguousTask {
                query: reference.to_string(),
                count,
            }),
        }
    }
}

/// Normalize a tag string by trimming, lowercasing, and replacing spaces with hyphens.
pub fn normalise_tag(s: &str) -> String {
    s.trim().to_lowercase().replace(' ', "-")
}

/// Split comma-separated tag strings and normalize each tag.
pub fn split_and_normalise_tags(inputs: &[String]) -> Vec<String> {
    let mut tags = Vec::new();
    for raw in inputs {
        for part in raw.split(',') {
            let tag = normalise_tag(part);
            if !tag.is_empty() {
                tags.push(tag);
            }
        }
    }
    tags.sort();
    tags.dedup();
    tags
}

/// Add and remove tags, keeping the result sorted and unique.
pub fn merge_tags(current: &[String], add: &[String], remove: &[String]) -> Vec<String> {
    let remove = split_and_normalise_tags(remove);
    let mut all = current.to_vec();
    all.extend(split_and_normalise_tags(add));
    let mut tags: Vec<String> = all.into_iter().filter(|t| !remove.contains(t)).collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Parse a human-readable due date relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday", "next friday", "this sunday" (and three-letter forms)
/// - "end of week", "end of month"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => return Some(start_end_of_this_week(today).1),
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(first_of_next - Duration::days(1));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return today.checked_add_signed(Duration::try_days(days)?);
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return today.checked_add_signed(Duration::try_weeks(weeks)?);
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current = today.weekday().num_days_from_monday() as i64;
    for (name, target) in weekdays {
        let ahead = (target + 7 - current) % 7;
        if s == name || s == format!("this {name}") {
            return Some(today + Duration::days(ahead));
        }
        if s == format!("next {name}") {
            let days = if ahead == 0 { 7 } else { ahead + 7 };
            return Some(today + Duration::days(days));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Calculate the start and end dates of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}
