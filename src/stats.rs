//! Read-only summaries over the task list: dashboard counts, analytics and
//! the month calendar.

use chrono::{Datelike, NaiveDate, TimeZone, Weekday};

use crate::error::{Result, TickitError};
use crate::profile::UserProfile;
use crate::task::Task;

/// Number of tasks shown as "recent" on the dashboard.
pub const RECENT_LIMIT: usize = 5;

/// Weekday labels in the order used by `weekday_completions`.
pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<'a> {
    pub pending: usize,
    pub completed: usize,
    pub lifetime_xp: u64,
    pub level: u32,
    pub streak: u32,
    /// Newest tasks first.
    pub recent: &'a [Task],
}

pub fn dashboard<'a>(tasks: &'a [Task], profile: &UserProfile) -> Dashboard<'a> {
    let completed = tasks.iter().filter(|t| t.is_completed()).count();
    Dashboard {
        pending: tasks.len() - completed,
        completed,
        lifetime_xp: profile.lifetime_xp(),
        level: profile.level,
        streak: profile.streak,
        recent: &tasks[..tasks.len().min(RECENT_LIMIT)],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Tasks per category, largest first, ties broken by name.
pub fn category_breakdown(tasks: &[Task]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for t in tasks {
        match counts.iter_mut().find(|c| c.category == t.category) {
            Some(c) => c.count += 1,
            None => counts.push(CategoryCount {
                category: t.category.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    counts
}

/// Completions per weekday, Monday first, bucketed by `completed_at` in `tz`.
pub fn weekday_completions<Tz: TimeZone>(tasks: &[Task], tz: &Tz) -> [usize; 7] {
    let mut out = [0; 7];
    for at in tasks.iter().filter_map(|t| t.completed_at) {
        let day = at.with_timezone(tz).weekday();
        out[day.num_days_from_monday() as usize] += 1;
    }
    out
}

/// Tasks whose `completed_at` falls on `date` in `tz`.
pub fn completed_on<Tz: TimeZone>(tasks: &[Task], date: NaiveDate, tz: &Tz) -> usize {
    tasks
        .iter()
        .filter_map(|t| t.completed_at)
        .filter(|at| at.with_timezone(tz).date_naive() == date)
        .count()
}

/// Share of tasks completed, in `0.0..=1.0`. An empty list is 0.
pub fn completion_rate(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    tasks.iter().filter(|t| t.is_completed()).count() as f64 / tasks.len() as f64
}

pub fn tasks_due_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.due_date == date).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<&'a Task>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthCalendar<'a> {
    pub year: i32,
    pub month: u32,
    /// Blank cells before day one in a Sunday-first grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay<'a>>,
}

/// Every day of `year`-`month` with the tasks due on it.
pub fn month_calendar(tasks: &[Task], year: i32, month: u32) -> Result<MonthCalendar<'_>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TickitError::InvalidInput(format!("invalid month {year}-{month}")))?;
    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| CalendarDay {
            date,
            tasks: tasks_due_on(tasks, date),
        })
        .collect();
    Ok(MonthCalendar {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}

/// Parse `YYYY-MM` as used by the calendar command.
pub fn parse_month(s: &str) -> Option<(i32, u32)> {
    let (y, m) = s.trim().split_once('-')?;
    let year = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}

pub fn weekday_label(day: Weekday) -> &'static str {
    WEEKDAYS[day.num_days_from_monday() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Status;
    use crate::task::TaskDraft;
    use chrono::{FixedOffset, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn task(title: &str, category: &str, due: NaiveDate) -> Task {
        let mut draft = TaskDraft::titled(title);
        draft.category = Some(category.into());
        draft.due_date = Some(due);
        Task::from_draft(draft, due, Utc::now())
    }

    fn complete(mut t: Task, at: &str) -> Task {
        t.status = Status::Completed;
        t.completed_at = Some(at.parse().unwrap());
        t
    }

    #[test]
    fn test_dashboard_counts() {
        let today = d(2026, 2, 2);
        let mut tasks: Vec<Task> = (0..7).map(|i| task(&i.to_string(), "Work", today)).collect();
        tasks[1] = complete(tasks[1].clone(), "2026-02-02T10:00:00Z");
        let mut profile = UserProfile::new("ada", Utc::now());
        profile.level = 3;
        profile.xp = 40;

        let dash = dashboard(&tasks, &profile);
        assert_eq!(dash.pending, 6);
        assert_eq!(dash.completed, 1);
        assert_eq!(dash.lifetime_xp, 100 + 200 + 40);
        assert_eq!(dash.level, 3);
        assert_eq!(dash.recent.len(), RECENT_LIMIT);
        assert_eq!(dash.recent[0].title, "0");
    }

    #[test]
    fn test_category_breakdown_orders_by_count_then_name() {
        let today = d(2026, 2, 2);
        let tasks = vec![
            task("a", "Home", today),
            task("b", "Work", today),
            task("c", "Errands", today),
            task("d", "Work", today),
        ];
        let got = category_breakdown(&tasks);
        let flat: Vec<(&str, usize)> = got.iter().map(|c| (c.category.as_str(), c.count)).collect();
        assert_eq!(flat, vec![("Work", 2), ("Errands", 1), ("Home", 1)]);
    }

    #[test]
    fn test_weekday_completions_use_timezone() {
        let today = d(2026, 2, 2);
        let tasks = vec![
            // Monday 23:30 UTC is Tuesday in UTC+2
            complete(task("a", "x", today), "2026-02-02T23:30:00Z"),
            complete(task("b", "x", today), "2026-02-08T12:00:00Z"),
            task("c", "x", today),
        ];
        let utc = weekday_completions(&tasks, &Utc);
        assert_eq!(utc, [1, 0, 0, 0, 0, 0, 1]);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(weekday_completions(&tasks, &plus_two), [0, 1, 0, 0, 0, 0, 1]);
        assert_eq!(completed_on(&tasks, d(2026, 2, 3), &plus_two), 1);
        assert_eq!(completed_on(&tasks, d(2026, 2, 3), &Utc), 0);
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(&[]), 0.0);
        let today = d(2026, 2, 2);
        let tasks = vec![
            complete(task("a", "x", today), "2026-02-02T10:00:00Z"),
            task("b", "x", today),
            task("c", "x", today),
            task("d", "x", today),
        ];
        assert!((completion_rate(&tasks) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_month_calendar() {
        let tasks = vec![
            task("rent", "Home", d(2026, 2, 1)),
            task("dentist", "Health", d(2026, 2, 14)),
            task("taxes", "Home", d(2026, 2, 14)),
            task("march", "Home", d(2026, 3, 1)),
        ];
        let cal = month_calendar(&tasks, 2026, 2).unwrap();
        assert_eq!(cal.days.len(), 28);
        // 1 Feb 2026 is a Sunday
        assert_eq!(cal.leading_blanks, 0);
        assert_eq!(cal.days[0].tasks.len(), 1);
        assert_eq!(cal.days[13].tasks.len(), 2);
        assert_eq!(cal.days.iter().map(|d| d.tasks.len()).sum::<usize>(), 3);

        assert_eq!(month_calendar(&tasks, 2026, 3).unwrap().leading_blanks, 0);
        assert_eq!(month_calendar(&tasks, 2026, 4).unwrap().leading_blanks, 3);
        assert!(matches!(month_calendar(&tasks, 2026, 13), Err(TickitError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-02"), Some((2026, 2)));
        assert_eq!(parse_month(" 2025-12 "), Some((2025, 12)));
        assert_eq!(parse_month("2026-00"), None);
        assert_eq!(parse_month("february"), None);
    }

    #[test]
    fn test_weekday_label() {
        assert_eq!(weekday_label(Weekday::Mon), "Mon");
        assert_eq!(weekday_label(Weekday::Sun), "Sun");
    }
}
