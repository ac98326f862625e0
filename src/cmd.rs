//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers behind every subcommand, from
//! task CRUD to the progression summaries, the focus timer and the optional
//! suggestion commands.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use chrono::{Datelike, Local, NaiveDate, Utc};
use tracing::debug;

use tickit::config::Config;
use tickit::error::{Result, TickitError};
use tickit::fields::*;
use tickit::gemini::GeminiClient;
use tickit::repository::{merge_tags, parse_due_input, split_and_normalise_tags, TaskQuery};
use tickit::stats;
use tickit::store::KeyValueStore;
use tickit::suggest::{Offline, SuggestionService, Suggestions};
use tickit::task::{Task, TaskDraft, TaskPatch};
use tickit::Tickit;

use crate::display::*;
use crate::tui::focus_run::run_focus_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: low | medium | high | urgent.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "friday", "in Nd" or "in Nw".
        #[arg(long)]
        due: Option<String>,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Category, "General" when omitted.
        #[arg(long)]
        category: Option<String>,
        /// Initial subtask. May be repeated.
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
        /// Person the task is assigned to.
        #[arg(long)]
        assign: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Due filter: today | this-week | overdue.
        #[arg(long, value_enum)]
        due: Option<DueWindow>,
        /// Case-insensitive text matched against title, description and category.
        #[arg(long)]
        search: Option<String>,
        /// Filter by tag. May be repeated. Accepts comma-separated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Created)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by id, id prefix or title.
    View {
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task id, id prefix or title.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Tags to add. May be repeated.
        #[arg(long = "tag")]
        add_tags: Vec<String>,
        /// Tags to remove. May be repeated.
        #[arg(long = "rm-tag")]
        rm_tags: Vec<String>,
        #[arg(long, conflicts_with = "unassign")]
        assign: Option<String>,
        #[arg(long)]
        unassign: bool,
        /// XP granted when the task is completed.
        #[arg(long)]
        xp: Option<u32>,
    },

    /// Mark a task as completed and collect its XP.
    Complete {
        id: String,
    },

    /// Move a completed task back to todo.
    Reopen {
        id: String,
        /// Allow the task's XP to be earned again on the next completion.
        #[arg(long)]
        reset_xp: bool,
    },

    /// Delete a task.
    Delete {
        id: String,
    },

    /// Manage a task's checklist.
    Subtask {
        #[command(subcommand)]
        action: SubtaskAction,
    },

    /// Show level, XP, streak and badges.
    Profile,

    /// Show dashboard counts and analytics.
    Stats,

    /// Show tasks due in a month.
    Calendar {
        /// Month as YYYY-MM, the current month when omitted.
        month: Option<String>,
    },

    /// Open the full-screen focus timer.
    Focus,

    /// Ask the suggestion service for help.
    Suggest {
        #[command(subcommand)]
        action: SuggestAction,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SubtaskAction {
    /// Append a subtask.
    Add {
        /// Task id, id prefix or title.
        id: String,
        title: String,
    },
    /// Toggle a subtask by its 1-based position.
    Toggle {
        id: String,
        index: usize,
    },
}

#[derive(Subcommand)]
pub enum SuggestAction {
    /// Split a task into smaller steps.
    Breakdown {
        id: String,
        /// Append the suggested subtasks and adopt the suggested priority.
        #[arg(long)]
        apply: bool,
    },
    /// One line of productivity advice.
    Insight,
    /// Propose a new task based on recent ones.
    Next,
    /// Search tasks with a natural-language query.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

/// Build a creation draft from `add` arguments.
pub fn build_draft(
    title: String,
    desc: Option<String>,
    priority: Option<Priority>,
    due: Option<String>,
    tags: Vec<String>,
    category: Option<String>,
    subtasks: Vec<String>,
    assign: Option<String>,
    today: NaiveDate,
) -> Result<TaskDraft> {
    Ok(TaskDraft {
        title,
        description: desc,
        priority,
        due_date: due.as_deref().map(|d| parse_due(d, today)).transpose()?,
        tags: split_and_normalise_tags(&tags),
        category,
        subtasks: subtasks.into_iter().filter(|s| !s.trim().is_empty()).collect(),
        assigned_to: assign,
    })
}

fn parse_due(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    parse_due_input(input, today)
        .ok_or_else(|| TickitError::InvalidInput(format!("unrecognised due date '{input}'")))
}

/// Add a new task.
pub fn cmd_add<S: KeyValueStore>(app: &mut Tickit<S>, draft: TaskDraft) -> Result<()> {
    let task = app.add_task(draft, Local::now().date_naive(), Utc::now())?;
    println!("Added task {} ({}, {} XP)", short_id(&task), task.title, task.xp_value);
    Ok(())
}

/// Order tasks in place for display.
pub fn sort_tasks(tasks: &mut [&Task], sort: SortKey) {
    match sort {
        // stored order is already newest first
        SortKey::Created => {}
        SortKey::Due => {
            tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(b.priority.cmp(&a.priority)))
        }
        SortKey::Priority => {
            tasks.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.due_date.cmp(&b.due_date)))
        }
    }
}

/// List tasks with optional filtering and sorting.
pub fn cmd_list<S: KeyValueStore>(
    app: &Tickit<S>,
    all: bool,
    status: Option<Status>,
    priority: Option<Priority>,
    due: Option<DueWindow>,
    search: Option<String>,
    tags: Vec<String>,
    sort: SortKey,
    limit: Option<usize>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let tags = split_and_normalise_tags(&tags);
    let query = TaskQuery {
        text: search.unwrap_or_default(),
        status,
        priority,
        due,
    };
    let mut filtered: Vec<&Task> = app
        .query(&query, today)
        .into_iter()
        .filter(|t| all || status.is_some() || !t.is_completed())
        .filter(|t| tags.iter().all(|tg| t.tags.contains(tg)))
        .collect();

    sort_tasks(&mut filtered, sort);
    if let Some(n) = limit {
        filtered.truncate(n);
    }
    if filtered.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    print_table(&filtered, today);
    Ok(())
}

/// View detailed information about a specific task.
pub fn cmd_view<S: KeyValueStore>(app: &Tickit<S>, id: String) -> Result<()> {
    let task_id = app.resolve(&id)?;
    let task = app.task(task_id).ok_or_else(|| TickitError::TaskNotFound(id.clone()))?;
    let today = Local::now().date_naive();
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Status:       {}", format_status(task.status));
    println!("Priority:     {}", format_priority(task.priority));
    println!("Category:     {}", task.category);
    println!("Due:          {} ({})", task.due_date, format_due_relative(task.due_date, today));
    let tags = if task.tags.is_empty() {
        "-".into()
    } else {
        task.tags.join(",")
    };
    println!("Tags:         {tags}");
    println!("Assigned to:  {}", task.assigned_to.as_deref().unwrap_or("-"));
    println!(
        "XP:           {}{}",
        task.xp_value,
        if task.xp_awarded { " (collected)" } else { "" }
    );
    println!("Created:      {}", task.created_at.to_rfc3339());
    if let Some(at) = task.completed_at {
        println!("Completed:    {}", at.to_rfc3339());
    }
    let description = if task.description.is_empty() {
        "-"
    } else {
        task.description.as_str()
    };
    println!("Description:\n{description}\n");
    if !task.subtasks.is_empty() {
        let (done, total) = task.subtask_progress();
        println!("Subtasks ({done}/{total}):");
        for (i, s) in task.subtasks.iter().enumerate() {
            let check = if s.is_completed { "x" } else { " " };
            println!("  {}. [{check}] {}", i + 1, s.title);
        }
    }
    Ok(())
}

/// Build a patch from `update` arguments against the task's current tags.
pub fn build_patch(
    current: &Task,
    title: Option<String>,
    desc: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    due: Option<String>,
    category: Option<String>,
    add_tags: Vec<String>,
    rm_tags: Vec<String>,
    assign: Option<String>,
    unassign: bool,
    xp: Option<u32>,
    today: NaiveDate,
) -> Result<TaskPatch> {
    let tags = if add_tags.is_empty() && rm_tags.is_empty() {
        None
    } else {
        Some(merge_tags(&current.tags, &add_tags, &rm_tags))
    };
    let assigned_to = if unassign {
        Some(None)
    } else {
        assign.map(Some)
    };
    Ok(TaskPatch {
        title,
        description: desc,
        priority,
        status,
        due_date: due.as_deref().map(|d| parse_due(d, today)).transpose()?,
        tags,
        category,
        subtasks: None,
        assigned_to,
        xp_value: xp,
    })
}

/// Update an existing task's fields.
pub fn cmd_update<S: KeyValueStore>(
    app: &mut Tickit<S>,
    id: String,
    patch: impl FnOnce(&Task) -> Result<TaskPatch>,
) -> Result<()> {
    let task_id = app.resolve(&id)?;
    let current = app.task(task_id).ok_or_else(|| TickitError::TaskNotFound(id.clone()))?;
    let patch = patch(current)?;
    if patch.is_empty() {
        println!("Nothing to update.");
        return Ok(());
    }
    let change = app.update_task(task_id, patch, Utc::now())?;
    if let Some(xp) = change.reward {
        println!("Completed {} (+{xp} XP)", change.task.title);
    } else {
        println!("Updated task {}", short_id(&change.task));
    }
    Ok(())
}

/// Mark a task as completed.
pub fn cmd_complete<S: KeyValueStore>(app: &mut Tickit<S>, id: String) -> Result<()> {
    let task_id = app.resolve(&id)?;
    let change = app.complete_task(task_id, Utc::now())?;
    match change.reward {
        Some(xp) => println!("Completed {} (+{xp} XP)", change.task.title),
        None if change.previous_status == Status::Completed => {
            println!("{} was already done.", change.task.title)
        }
        None => println!("Completed {} (XP already collected)", change.task.title),
    }
    print_profile_line(app.profile());
    Ok(())
}

/// Reopen a completed task.
pub fn cmd_reopen<S: KeyValueStore>(app: &mut Tickit<S>, id: String, reset_xp: bool) -> Result<()> {
    let task_id = app.resolve(&id)?;
    let change = app.reopen_task(task_id, reset_xp, Utc::now())?;
    println!("Reopened {}", change.task.title);
    Ok(())
}

pub fn cmd_delete<S: KeyValueStore>(app: &mut Tickit<S>, id: String) -> Result<()> {
    let task_id = app.resolve(&id)?;
    let task = app.delete_task(task_id)?;
    println!("Deleted {} ({})", short_id(&task), task.title);
    Ok(())
}

pub fn cmd_subtask<S: KeyValueStore>(app: &mut Tickit<S>, action: SubtaskAction) -> Result<()> {
    match action {
        SubtaskAction::Add { id, title } => {
            let task_id = app.resolve(&id)?;
            let sub = app.add_subtask(task_id, &title)?;
            println!("Added subtask '{}'", sub.title);
        }
        SubtaskAction::Toggle { id, index } => {
            if index == 0 {
                return Err(TickitError::InvalidInput("subtask positions start at 1".into()));
            }
            let task_id = app.resolve(&id)?;
            let sub = app.toggle_subtask(task_id, index - 1)?;
            let state = if sub.is_completed { "done" } else { "open" };
            println!("Subtask '{}' is now {state}", sub.title);
        }
    }
    Ok(())
}

/// Show the user profile with badges.
pub fn cmd_profile<S: KeyValueStore>(app: &Tickit<S>) -> Result<()> {
    let p = app.profile();
    println!("{} (joined {})", p.name, p.joined_date.with_timezone(&Local).format("%Y-%m-%d"));
    print_profile_line(p);
    println!("Tasks completed: {}", p.completed_tasks);
    println!("Lifetime XP:     {}", p.lifetime_xp());
    println!();
    println!("Badges:");
    for spec in app.engine().catalog() {
        let unlocked = p.badge(spec.id).and_then(|b| b.unlocked_at);
        match unlocked {
            Some(at) => println!(
                "  {} {:<14} unlocked {}",
                spec.icon,
                spec.name,
                at.with_timezone(&Local).format("%Y-%m-%d")
            ),
            None => println!("  {} {:<14} locked ({})", spec.icon, spec.name, spec.rule),
        }
    }
    Ok(())
}

/// Dashboard counts and analytics.
pub fn cmd_stats<S: KeyValueStore>(app: &Tickit<S>) -> Result<()> {
    if app.repository().is_empty() {
        println!("No tasks yet.");
        return Ok(());
    }
    let tasks = app.tasks();
    let dash = stats::dashboard(tasks, app.profile());
    println!("Pending:     {}", dash.pending);
    println!("Completed:   {}", dash.completed);
    println!("Lifetime XP: {}", dash.lifetime_xp);
    println!("Level:       {}   Streak: {}d", dash.level, dash.streak);
    println!("Completion:  {:.0}%", stats::completion_rate(tasks) * 100.0);

    println!();
    println!("{:<16} {}", "Category", "Count");
    for c in stats::category_breakdown(tasks) {
        println!("{:<16} {}", truncate(&c.category, 16), c.count);
    }

    println!();
    println!("Completions by weekday:");
    let per_day = stats::weekday_completions(tasks, &Local);
    let max = per_day.iter().copied().max().unwrap_or(0).max(1);
    for (label, n) in stats::WEEKDAYS.iter().zip(per_day) {
        println!("  {label} {:<3} {}", n, "#".repeat(n * 20 / max));
    }

    if !dash.recent.is_empty() {
        println!();
        println!("Recent:");
        let recent: Vec<&Task> = dash.recent.iter().collect();
        print_table(&recent, Local::now().date_naive());
    }
    Ok(())
}

/// Tasks due in a month, one line per day that has any.
pub fn cmd_calendar<S: KeyValueStore>(app: &Tickit<S>, month: Option<String>) -> Result<()> {
    let today = Local::now().date_naive();
    let (year, month) = match month {
        Some(m) => stats::parse_month(&m).ok_or_else(|| {
            TickitError::InvalidInput(format!("expected YYYY-MM, got '{m}'"))
        })?,
        None => (today.year(), today.month()),
    };
    let cal = stats::month_calendar(app.tasks(), year, month)?;
    println!("{year}-{month:02}");
    println!(" Su Mo Tu We Th Fr Sa");
    let mut line = "   ".repeat(cal.leading_blanks as usize);
    for day in &cal.days {
        let marker = if day.tasks.is_empty() { ' ' } else { '*' };
        line.push_str(&format!("{:>2}{marker}", day.date.day()));
        if day.date.weekday() == chrono::Weekday::Sat {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
    println!();
    for day in cal.days.iter().filter(|d| !d.tasks.is_empty()) {
        let marker = if day.date == today { " (today)" } else { "" };
        println!(
            "{} {:02}{marker}",
            stats::weekday_label(day.date.weekday()),
            day.date.day()
        );
        for t in &day.tasks {
            println!("  {} {} [{}]", short_id(t), t.title, format_status(t.status));
        }
    }
    Ok(())
}

/// Launch the focus timer.
pub fn cmd_focus<S: KeyValueStore>(app: &mut Tickit<S>, config: &Config) -> Result<()> {
    run_focus_tui(app, config)
}

fn suggestions(config: &Config) -> Suggestions {
    let service: Box<dyn SuggestionService> = match &config.api_key {
        Some(key) => Box::new(GeminiClient::new(key.clone(), config.model.clone())),
        None => {
            debug!("no API key, suggestions are offline");
            Box::new(Offline)
        }
    };
    Suggestions::new(service, config.suggest_timeout)
}

pub fn cmd_suggest<S: KeyValueStore>(
    app: &mut Tickit<S>,
    config: &Config,
    action: SuggestAction,
) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let service = suggestions(config);
    let today = Local::now().date_naive();

    match action {
        SuggestAction::Breakdown { id, apply } => {
            let task_id = app.resolve(&id)?;
            let task = app.task(task_id).ok_or_else(|| TickitError::TaskNotFound(id.clone()))?;
            let Some(breakdown) = rt.block_on(service.breakdown(task)) else {
                println!("No breakdown available right now.");
                return Ok(());
            };
            println!("Suggested steps for {}:", task.title);
            for (i, s) in breakdown.subtasks.iter().enumerate() {
                println!("  {}. {}", i + 1, s.title);
            }
            println!("Priority: {}", breakdown.suggested_priority);
            println!("\"{}\"", breakdown.motivational_quote);
            if apply {
                let updated = app.apply_breakdown(task_id, &breakdown, Utc::now())?;
                println!(
                    "Applied: {} subtasks, priority {}",
                    updated.subtasks.len(),
                    format_priority(updated.priority)
                );
            }
        }
        SuggestAction::Insight => {
            let done_today = stats::completed_on(app.tasks(), today, &Local);
            println!("{}", rt.block_on(service.insight(app.tasks().len(), done_today)));
        }
        SuggestAction::Next => match rt.block_on(service.next_task(app.tasks())) {
            Some(s) => {
                println!("{} [{}]", s.suggestion, s.priority);
                if !s.reasoning.is_empty() {
                    println!("  {}", s.reasoning);
                }
            }
            None => println!("No suggestion available right now."),
        },
        SuggestAction::Search { query } => {
            let text = query.join(" ");
            let q = rt.block_on(service.search(&text)).unwrap_or_else(|| {
                println!("Searching titles for '{text}'.");
                TaskQuery {
                    text: text.clone(),
                    ..TaskQuery::all()
                }
            });
            let found = app.query(&q, today);
            if found.is_empty() {
                println!("No tasks found.");
            } else {
                print_table(&found, today);
            }
        }
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickit::progression::ProgressionEngine;
    use tickit::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()
    }

    fn app() -> Tickit<MemoryStore> {
        Tickit::open(MemoryStore::new(), ProgressionEngine::default(), "Sam", &Utc::now()).unwrap()
    }

    #[test]
    fn test_build_draft_parses_due_and_tags() {
        let draft = build_draft(
            "Pay rent".into(),
            None,
            Some(Priority::High),
            Some("tomorrow".into()),
            vec!["Home, Bills".into()],
            Some("Finance".into()),
            vec!["log in".into(), " ".into()],
            None,
            today(),
        )
        .unwrap();
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2026, 6, 11));
        assert_eq!(draft.tags, vec!["bills", "home"]);
        assert_eq!(draft.subtasks, vec!["log in"]);
        assert_eq!(draft.priority, Some(Priority::High));
    }

    #[test]
    fn test_bad_due_date_is_rejected() {
        let err = build_draft(
            "x".into(),
            None,
            None,
            Some("someday".into()),
            vec![],
            None,
            vec![],
            None,
            today(),
        );
        assert!(matches!(err, Err(TickitError::InvalidInput(_))));
    }

    #[test]
    fn test_build_patch_merges_tags_and_assignment() {
        let mut app = app();
        let mut draft = TaskDraft::titled("Report");
        draft.tags = vec!["work".into(), "q3".into()];
        draft.assigned_to = Some("kim".into());
        let task = app.add_task(draft, today(), Utc::now()).unwrap();

        let patch = build_patch(
            &task,
            None,
            None,
            None,
            None,
            None,
            None,
            vec!["urgent".into()],
            vec!["q3".into()],
            None,
            true,
            Some(50),
            today(),
        )
        .unwrap();
        assert_eq!(patch.tags, Some(vec!["urgent".to_string(), "work".to_string()]));
        assert_eq!(patch.assigned_to, Some(None));
        assert_eq!(patch.xp_value, Some(50));

        let empty = build_patch(
            &task,
            None,
            None,
            None,
            None,
            None,
            None,
            vec![],
            vec![],
            None,
            false,
            None,
            today(),
        )
        .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_update_and_complete_through_commands() {
        let mut app = app();
        let task = app.add_task(TaskDraft::titled("Write essay"), today(), Utc::now()).unwrap();

        cmd_update(&mut app, "write essay".into(), |t| {
            build_patch(
                t,
                None,
                None,
                Some(Priority::Urgent),
                None,
                None,
                None,
                vec![],
                vec![],
                None,
                false,
                None,
                today(),
            )
        })
        .unwrap();
        assert_eq!(app.task(task.id).unwrap().priority, Priority::Urgent);

        cmd_complete(&mut app, task.id.to_string()).unwrap();
        assert_eq!(app.profile().xp, 20);
        // second completion is a no-op for XP
        cmd_complete(&mut app, task.id.to_string()).unwrap();
        assert_eq!(app.profile().xp, 20);
    }

    #[test]
    fn test_subtask_positions_are_one_based() {
        let mut app = app();
        let mut draft = TaskDraft::titled("Move");
        draft.subtasks = vec!["pack".into()];
        let task = app.add_task(draft, today(), Utc::now()).unwrap();
        let id = task.id.to_string();

        let toggle = |index| SubtaskAction::Toggle {
            id: id.clone(),
            index,
        };
        assert!(cmd_subtask(&mut app, toggle(0)).is_err());
        cmd_subtask(&mut app, toggle(1)).unwrap();
        assert!(app.task(task.id).unwrap().subtasks[0].is_completed);
        assert!(cmd_subtask(&mut app, toggle(2)).is_err());
    }

    #[test]
    fn test_sort_tasks() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 6, day).unwrap();
        let make = |title: &str, due, priority| {
            let mut draft = TaskDraft::titled(title);
            draft.due_date = Some(due);
            draft.priority = Some(priority);
            Task::from_draft(draft, today(), Utc::now())
        };
        let a = make("a", d(12), Priority::Low);
        let b = make("b", d(11), Priority::Urgent);
        let c = make("c", d(11), Priority::Medium);

        let mut by_due = vec![&a, &b, &c];
        sort_tasks(&mut by_due, SortKey::Due);
        assert_eq!(by_due.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(), ["b", "c", "a"]);

        let mut by_priority = vec![&a, &c, &b];
        sort_tasks(&mut by_priority, SortKey::Priority);
        let titles: Vec<_> = by_priority.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["b", "c", "a"]);
    }

    #[test]
    fn test_calendar_rejects_bad_month() {
        let app = app();
        assert!(cmd_calendar(&app, Some("2026-13".into())).is_err());
        assert!(cmd_calendar(&app, Some("2026-02".into())).is_ok());
    }
}
