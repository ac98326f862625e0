//! Enumerations and field types for task management.
//!
//! This module defines the structured values used to classify tasks: priority,
//! lifecycle status, due-date windows used by filters and list sort keys.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How important a task is. Ordered from least to most pressing.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Parse the upper-case wire name (`LOW`, `MEDIUM`, ...), ignoring case.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Priority::Low),
            "MEDIUM" => Some(Priority::Medium),
            "HIGH" => Some(Priority::High),
            "URGENT" => Some(Priority::Urgent),
            _ => None,
        }
    }

    /// Tasks at this priority show up as focus targets.
    pub fn is_focus(self) -> bool {
        matches!(self, Priority::High | Priority::Urgent)
    }
}

/// Task lifecycle status. Any transition between values is allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    #[value(alias = "done")]
    Completed,
}

impl Status {
    /// Parse the upper-case wire name (`TODO`, `IN_PROGRESS`, `COMPLETED`), ignoring case.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "TODO" => Some(Status::Todo),
            "IN_PROGRESS" => Some(Status::InProgress),
            "COMPLETED" | "DONE" => Some(Status::Completed),
            _ => None,
        }
    }
}

/// Due-date window used when filtering tasks.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DueWindow {
    Today,
    ThisWeek,
    Overdue,
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    /// Keep the stored newest-first order.
    Created,
    Due,
    Priority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_stored_layout() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"IN_PROGRESS\"");
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"URGENT\"");
        let s: Status = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(s, Status::Completed);
    }

    #[test]
    fn test_from_name_is_lenient() {
        assert_eq!(Priority::from_name(" high "), Some(Priority::High));
        assert_eq!(Priority::from_name("ALL"), None);
        assert_eq!(Status::from_name("in-progress"), Some(Status::InProgress));
        assert_eq!(Status::from_name("done"), Some(Status::Completed));
        assert_eq!(Status::from_name("ALL"), None);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High.is_focus());
        assert!(!Priority::Medium.is_focus());
    }
}
