//! # Tickit - gamified task manager CLI
//!
//! A command-line task manager that rewards finished work. Every completed
//! task earns XP, XP fills levels, daily use builds a streak and milestones
//! unlock badges. A full-screen focus timer keeps the urgent work in view.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! tickit add "Write quarterly report" --priority high --due friday --tag work
//!
//! # List open tasks, most pressing first
//! tickit list --sort priority
//!
//! # Finish it and collect the XP
//! tickit complete "write quarterly report"
//!
//! # Check level, streak and badges
//! tickit profile
//!
//! # Start a focus session
//! tickit focus
//! ```
//!
//! ## Key Commands
//!
//! - `tickit add <title>` - Create a task with optional metadata
//! - `tickit list` - View tasks with filters and sorting
//! - `tickit complete <id>` - Complete a task and gain XP
//! - `tickit stats` / `tickit calendar` - Dashboard, analytics and due dates
//! - `tickit focus` - Pomodoro-style focus timer
//! - `tickit suggest ...` - Optional suggestions (needs `GEMINI_API_KEY`)
//!
//! Data is stored locally in `~/.tickit/` as `tickit-tasks.json` and
//! `tickit-user.json`. Set `TICKIT_LOG=debug` (or pass `--verbose`) to see
//! what the app is doing.

use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tickit::config::Config;
use tickit::error::Result;
use tickit::events::{drain, AppEvent};
use tickit::progression::ProgressionEngine;
use tickit::store::JsonFileStore;
use tickit::Tickit;

pub mod cli;
pub mod cmd;
pub mod display;
pub mod tui {
    pub mod colors;
    pub mod focus;
    pub mod focus_run;
    pub mod input;
}

use cli::Cli;
use cmd::*;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TICKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Completions need no state
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.dir {
        config = config.data_dir(dir);
    }

    let store = JsonFileStore::open(config.data_dir.clone())?;
    let engine = ProgressionEngine::new(config.leveling);
    let now = Local::now();
    let mut app = Tickit::load(store, engine, &config.user_name, now.with_timezone(&Utc));
    let mut events = app.subscribe();
    app.start_session(&now)?;

    let today = now.date_naive();
    let result = match cli.command {
        Commands::Add {
            title,
            desc,
            priority,
            due,
            tags,
            category,
            subtasks,
            assign,
        } => build_draft(
            title, desc, priority, due, tags, category, subtasks, assign, today,
        )
        .and_then(|draft| cmd_add(&mut app, draft)),

        Commands::List {
            all,
            status,
            priority,
            due,
            search,
            tags,
            sort,
            limit,
        } => cmd_list(&app, all, status, priority, due, search, tags, sort, limit),

        Commands::View { id } => cmd_view(&app, id),

        Commands::Update {
            id,
            title,
            desc,
            priority,
            status,
            due,
            category,
            add_tags,
            rm_tags,
            assign,
            unassign,
            xp,
        } => cmd_update(&mut app, id, |current| {
            build_patch(
                current, title, desc, priority, status, due, category, add_tags, rm_tags,
                assign, unassign, xp, today,
            )
        }),

        Commands::Complete { id } => cmd_complete(&mut app, id),

        Commands::Reopen { id, reset_xp } => cmd_reopen(&mut app, id, reset_xp),

        Commands::Delete { id } => cmd_delete(&mut app, id),

        Commands::Subtask { action } => cmd_subtask(&mut app, action),

        Commands::Profile => cmd_profile(&app),

        Commands::Stats => cmd_stats(&app),

        Commands::Calendar { month } => cmd_calendar(&app, month),

        Commands::Focus => cmd_focus(&mut app, &config),

        Commands::Suggest { action } => cmd_suggest(&mut app, &config, action),

        Commands::Completions { .. } => unreachable!("completions handled above"),
    };

    announce(drain(&mut events));
    result
}

/// Print the progression events worth celebrating.
fn announce(events: Vec<AppEvent>) {
    for event in events {
        match event {
            AppEvent::LevelUp { level } => println!("Level up! You reached level {level}."),
            AppEvent::BadgeUnlocked(badge) => {
                println!("Badge unlocked: {} {}", badge.icon, badge.name)
            }
            AppEvent::StreakChanged { streak } if streak > 1 => println!("{streak}-day streak!"),
            _ => {}
        }
    }
}
