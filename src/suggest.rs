//! Best-effort text suggestions.
//!
//! `SuggestionService` is the seam to an external generative model. Nothing
//! in the core waits on it: `Suggestions` wraps any service with a timeout
//! and turns every failure into a fallback value.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TickitError};
use crate::fields::{DueWindow, Priority, Status};
use crate::repository::TaskQuery;
use crate::task::Task;

/// Advice shown when the service cannot produce an insight.
pub const FALLBACK_INSIGHT: &str = "Keep moving forward, one task at a time!";

/// A task split into smaller steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBreakdown {
    pub subtasks: Vec<SuggestedSubtask>,
    /// One of LOW, MEDIUM, HIGH, URGENT as returned by the model.
    pub suggested_priority: String,
    pub motivational_quote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedSubtask {
    pub title: String,
}

impl TaskBreakdown {
    /// The suggested priority, if it names a known value.
    pub fn priority(&self) -> Option<Priority> {
        Priority::from_name(&self.suggested_priority)
    }
}

/// A new task the user might want to add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSuggestion {
    pub suggestion: String,
    pub reasoning: String,
    pub priority: String,
}

/// Filters extracted from a natural-language search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// TODO, IN_PROGRESS, COMPLETED or ALL.
    pub status: String,
    /// LOW, MEDIUM, HIGH, URGENT or ALL.
    pub priority: String,
    /// today, week or all.
    pub time_range: String,
}

impl SearchFilters {
    /// Convert to a repository query. Unrecognised values match everything.
    pub fn to_query(&self) -> TaskQuery {
        let due = match self.time_range.trim().to_lowercase().as_str() {
            "today" => Some(DueWindow::Today),
            "week" | "this week" | "this-week" => Some(DueWindow::ThisWeek),
            "overdue" => Some(DueWindow::Overdue),
            _ => None,
        };
        TaskQuery {
            text: String::new(),
            status: Status::from_name(&self.status),
            priority: Priority::from_name(&self.priority),
            due,
        }
    }
}

/// An external source of suggestions. Every call may fail.
#[async_trait]
pub trait SuggestionService: Send + Sync {
    /// Split a task into 3-5 actionable subtasks.
    async fn task_breakdown(&self, title: &str, description: &str) -> Result<TaskBreakdown>;

    /// One sentence of advice for the given totals.
    async fn productivity_insight(&self, total: usize, completed_today: usize) -> Result<String>;

    /// Propose a task based on recent ones.
    async fn suggest_task(&self, recent: &[Task]) -> Result<TaskSuggestion>;

    /// Translate a free-text query into filters.
    async fn parse_search(&self, query: &str) -> Result<SearchFilters>;
}

/// Service used when no API key is configured. Every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

fn offline<T>() -> Result<T> {
    Err(TickitError::Suggestion("no API key configured".into()))
}

#[async_trait]
impl SuggestionService for Offline {
    async fn task_breakdown(&self, _title: &str, _description: &str) -> Result<TaskBreakdown> {
        offline()
    }

    async fn productivity_insight(&self, _total: usize, _completed_today: usize) -> Result<String> {
        offline()
    }

    async fn suggest_task(&self, _recent: &[Task]) -> Result<TaskSuggestion> {
        offline()
    }

    async fn parse_search(&self, _query: &str) -> Result<SearchFilters> {
        offline()
    }
}

/// Wraps a service with a timeout and fallbacks. Failures are logged, never returned.
pub struct Suggestions {
    service: Box<dyn SuggestionService>,
    timeout: Duration,
}

impl Suggestions {
    pub fn new(service: Box<dyn SuggestionService>, timeout: Duration) -> Self {
        Suggestions { service, timeout }
    }

    async fn bounded<T>(
        &self,
        what: &str,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(v)) => Some(v),
            Ok(Err(e)) => {
                warn!(call = what, error = %e, "suggestion failed, using fallback");
                None
            }
            Err(_) => {
                warn!(
                    call = what,
                    timeout_secs = self.timeout.as_secs(),
                    "suggestion timed out, using fallback"
                );
                None
            }
        }
    }

    pub async fn breakdown(&self, task: &Task) -> Option<TaskBreakdown> {
        self.bounded("breakdown", self.service.task_breakdown(&task.title, &task.description))
            .await
    }

    pub async fn insight(&self, total: usize, completed_today: usize) -> String {
        self.bounded("insight", self.service.productivity_insight(total, completed_today))
            .await
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| FALLBACK_INSIGHT.to_string())
    }

    /// Uses at most the ten most recent tasks.
    pub async fn next_task(&self, tasks: &[Task]) -> Option<TaskSuggestion> {
        let recent = &tasks[..tasks.len().min(10)];
        self.bounded("next_task", self.service.suggest_task(recent)).await
    }

    pub async fn search(&self, query: &str) -> Option<TaskQuery> {
        self.bounded("search", self.service.parse_search(query))
            .await
            .map(|f| f.to_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;
    use chrono::{NaiveDate, Utc};

    struct Canned;

    #[async_trait]
    impl SuggestionService for Canned {
        async fn task_breakdown(&self, title: &str, _description: &str) -> Result<TaskBreakdown> {
            Ok(TaskBreakdown {
                subtasks: vec![SuggestedSubtask { title: format!("Start {title}") }],
                suggested_priority: "urgent".into(),
                motivational_quote: "You got this".into(),
            })
        }

        async fn productivity_insight(
            &self,
            total: usize,
            completed_today: usize,
        ) -> Result<String> {
            Ok(format!("{completed_today} of {total}\n"))
        }

        async fn suggest_task(&self, recent: &[Task]) -> Result<TaskSuggestion> {
            Ok(TaskSuggestion {
                suggestion: format!("saw {}", recent.len()),
                reasoning: String::new(),
                priority: "LOW".into(),
            })
        }

        async fn parse_search(&self, _query: &str) -> Result<SearchFilters> {
            Ok(SearchFilters {
                status: "TODO".into(),
                priority: "ALL".into(),
                time_range: "week".into(),
            })
        }
    }

    struct Slow;

    #[async_trait]
    impl SuggestionService for Slow {
        async fn task_breakdown(&self, _t: &str, _d: &str) -> Result<TaskBreakdown> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            offline()
        }
        async fn productivity_insight(&self, _t: usize, _c: usize) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".into())
        }
        async fn suggest_task(&self, _r: &[Task]) -> Result<TaskSuggestion> {
            offline()
        }
        async fn parse_search(&self, _q: &str) -> Result<SearchFilters> {
            offline()
        }
    }

    fn task(title: &str) -> Task {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        Task::from_draft(TaskDraft::titled(title), today, Utc::now())
    }

    #[tokio::test]
    async fn test_offline_falls_back() {
        let s = Suggestions::new(Box::new(Offline), Duration::from_secs(1));
        assert_eq!(s.insight(3, 1).await, FALLBACK_INSIGHT);
        assert!(s.breakdown(&task("a")).await.is_none());
        assert!(s.next_task(&[]).await.is_none());
        assert!(s.search("urgent stuff").await.is_none());
    }

    #[tokio::test]
    async fn test_successful_calls_pass_through() {
        let s = Suggestions::new(Box::new(Canned), Duration::from_secs(1));
        let b = s.breakdown(&task("taxes")).await.unwrap();
        assert_eq!(b.subtasks[0].title, "Start taxes");
        assert_eq!(b.priority(), Some(Priority::Urgent));
        assert_eq!(s.insight(5, 2).await, "2 of 5");

        let tasks: Vec<Task> = (0..12).map(|i| task(&i.to_string())).collect();
        assert_eq!(s.next_task(&tasks).await.unwrap().suggestion, "saw 10");

        let q = s.search("what's left this week").await.unwrap();
        assert_eq!(q.status, Some(Status::Todo));
        assert_eq!(q.priority, None);
        assert_eq!(q.due, Some(DueWindow::ThisWeek));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let s = Suggestions::new(Box::new(Slow), Duration::from_secs(1));
        assert_eq!(s.insight(1, 1).await, FALLBACK_INSIGHT);
        assert!(s.breakdown(&task("a")).await.is_none());
    }

    #[test]
    fn test_filters_with_all_match_everything() {
        let f = SearchFilters {
            status: "ALL".into(),
            priority: "ALL".into(),
            time_range: "all".into(),
        };
        assert_eq!(f.to_query(), TaskQuery::all());
    }

    #[test]
    fn test_breakdown_wire_format() {
        let json = r#"{"subtasks":[{"title":"a"}],"suggestedPriority":"BOGUS","motivationalQuote":"q"}"#;
        let b: TaskBreakdown = serde_json::from_str(json).unwrap();
        assert_eq!(b.priority(), None);
    }
}
