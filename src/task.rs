//! Task data structure and related functionality.
//!
//! This module defines the `Task` struct that represents a single work item,
//! its subtasks, and the partial shapes used to create (`TaskDraft`) and
//! modify (`TaskPatch`) tasks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::*;

/// XP granted for completing a task when none is specified.
pub const DEFAULT_XP_VALUE: u32 = 20;
/// Category assigned to tasks created without one.
pub const DEFAULT_CATEGORY: &str = "General";
/// Title used when a task is created with a blank title.
pub const UNTITLED: &str = "Untitled Task";

/// A unit of work with scheduling, classification and reward metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub xp_value: u32,
    /// Set the first time `xp_value` is credited to the profile.
    #[serde(default)]
    pub xp_awarded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A checklist item inside a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl SubTask {
    pub fn new(title: impl Into<String>) -> Self {
        SubTask {
            id: Uuid::new_v4(),
            title: title.into(),
            is_completed: false,
        }
    }
}

/// Fields a caller may supply when creating a task. Everything else is defaulted.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub subtasks: Vec<String>,
    pub assigned_to: Option<String>,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub subtasks: Option<Vec<SubTask>>,
    pub assigned_to: Option<Option<String>>,
    pub xp_value: Option<u32>,
}

impl TaskPatch {
    /// Patch that only changes the status.
    pub fn status(status: Status) -> Self {
        TaskPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

impl Task {
    /// Build a task from a draft, filling unset fields with defaults.
    pub fn from_draft(draft: TaskDraft, today: NaiveDate, now: DateTime<Utc>) -> Self {
        let title = draft.title.trim();
        let category = draft
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        Task {
            id: Uuid::new_v4(),
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            },
            description: draft.description.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
            status: Status::Todo,
            due_date: draft.due_date.unwrap_or(today),
            created_at: now,
            tags: draft.tags,
            category,
            subtasks: draft.subtasks.into_iter().map(SubTask::new).collect(),
            assigned_to: draft.assigned_to,
            xp_value: DEFAULT_XP_VALUE,
            xp_awarded: false,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Merge a patch into this task. Returns the status held before the merge.
    ///
    /// `completed_at` follows the status: stamped on entering COMPLETED,
    /// cleared on leaving it.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) -> Status {
        let previous = self.status;
        if let Some(t) = patch.title {
            self.title = t;
        }
        if let Some(d) = patch.description {
            self.description = d;
        }
        if let Some(p) = patch.priority {
            self.priority = p;
        }
        if let Some(d) = patch.due_date {
            self.due_date = d;
        }
        if let Some(t) = patch.tags {
            self.tags = t;
        }
        if let Some(c) = patch.category {
            self.category = c;
        }
        if let Some(s) = patch.subtasks {
            self.subtasks = s;
        }
        if let Some(a) = patch.assigned_to {
            self.assigned_to = a;
        }
        if let Some(x) = patch.xp_value {
            self.xp_value = x;
        }
        if let Some(s) = patch.status {
            self.status = s;
            match (previous == Status::Completed, s == Status::Completed) {
                (false, true) => self.completed_at = Some(now),
                (true, false) => self.completed_at = None,
                _ => {}
            }
        }
        previous
    }

    /// Number of completed subtasks and the total.
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.is_completed).count();
        (done, self.subtasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_from_draft_fills_defaults() {
        let now = Utc::now();
        let task = Task::from_draft(TaskDraft::default(), today(), now);
        assert_eq!(task.title, UNTITLED);
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, "General");
        assert_eq!(task.xp_value, 20);
        assert_eq!(task.due_date, today());
        assert_eq!(task.created_at, now);
        assert!(task.tags.is_empty());
        assert!(task.subtasks.is_empty());
        assert!(!task.xp_awarded);
    }

    #[test]
    fn test_from_draft_keeps_supplied_fields() {
        let draft = TaskDraft {
            title: "  Write report ".into(),
            priority: Some(Priority::High),
            category: Some("Work".into()),
            subtasks: vec!["Outline".into(), "Draft".into()],
            ..Default::default()
        };
        let task = Task::from_draft(draft, today(), Utc::now());
        assert_eq!(task.title, "Write report");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category, "Work");
        assert_eq!(task.subtasks.len(), 2);
        assert_eq!(task.subtask_progress(), (0, 2));
    }

    #[test]
    fn test_apply_tracks_completion_time() {
        let mut task = Task::from_draft(TaskDraft::titled("a"), today(), Utc::now());
        let now = Utc::now();
        let prev = task.apply(TaskPatch::status(Status::Completed), now);
        assert_eq!(prev, Status::Todo);
        assert_eq!(task.completed_at, Some(now));

        let prev = task.apply(TaskPatch::status(Status::Todo), now);
        assert_eq!(prev, Status::Completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_apply_leaves_unset_fields() {
        let mut task = Task::from_draft(TaskDraft::titled("a"), today(), Utc::now());
        let before = task.clone();
        let patch = TaskPatch {
            title: Some("b".into()),
            ..Default::default()
        };
        task.apply(patch, Utc::now());
        assert_eq!(task.title, "b");
        assert_eq!(task.priority, before.priority);
        assert_eq!(task.id, before.id);
        assert_eq!(task.created_at, before.created_at);
    }

    #[test]
    fn test_reads_stored_layout() {
        let json = r#"{
            "id": "0b6f3a1e-8a8e-4d6c-9a77-2f0f4c1f2b10",
            "title": "Buy milk",
            "description": "",
            "priority": "LOW",
            "status": "TODO",
            "dueDate": "2026-03-14",
            "createdAt": "2026-03-14T08:00:00Z",
            "tags": [],
            "category": "Errands",
            "subtasks": [{"id": "5c1b7e0a-3a7d-4c0e-8f39-7f1b0d7e4a21", "title": "Go", "isCompleted": true}],
            "xpValue": 20
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.subtask_progress(), (1, 1));
        assert!(!task.xp_awarded);
    }
}
