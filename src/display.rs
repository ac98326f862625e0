//! Plain-text rendering helpers for CLI output.

use chrono::NaiveDate;

use tickit::fields::{Priority, Status};
use tickit::profile::UserProfile;
use tickit::task::Task;

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        -1 => "yesterday".into(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d late", -d),
    }
}

pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
        Priority::Urgent => "Urgent",
    }
}

pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Todo => "Todo",
        Status::InProgress => "InProgress",
        Status::Completed => "Done",
    }
}

/// First eight hex digits of the id, enough to resolve a task on the command line.
pub fn short_id(task: &Task) -> String {
    task.id.simple().to_string()[..8].to_string()
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task], today: NaiveDate) {
    println!(
        "{:<9} {:<11} {:<7} {:<10} {:<12} {}",
        "ID", "Status", "Pri", "Due", "Category", "Title [tags]"
    );
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        let (done, total) = t.subtask_progress();
        let progress = if total == 0 { String::new() } else { format!(" ({done}/{total})") };
        println!(
            "{:<9} {:<11} {:<7} {:<10} {:<12} {}{}{}",
            short_id(t),
            format_status(t.status),
            format_priority(t.priority),
            format_due_relative(t.due_date, today),
            truncate(&t.category, 12),
            t.title,
            progress,
            tags
        );
    }
}

/// Fixed-width text progress bar.
pub fn bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn print_profile_line(profile: &UserProfile) {
    println!(
        "Level {}  {} {}/{} XP  streak {}d",
        profile.level,
        bar(profile.level_progress(), 20),
        profile.xp,
        profile.level_threshold(),
        profile.streak
    );
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_relative() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        let on = |d| NaiveDate::from_ymd_opt(2026, 5, d).unwrap();
        assert_eq!(format_due_relative(on(10), today), "today");
        assert_eq!(format_due_relative(on(11), today), "tomorrow");
        assert_eq!(format_due_relative(on(9), today), "yesterday");
        assert_eq!(format_due_relative(on(14), today), "in 4d");
        assert_eq!(format_due_relative(on(3), today), "7d late");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 12), "short");
        assert_eq!(truncate("Groceries & errands", 8), "Groceri…");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0, 4), "[----]");
        assert_eq!(bar(0.5, 4), "[##--]");
        assert_eq!(bar(2.0, 4), "[####]");
    }
}
