//! Focus timer TUI entry point and setup.

use std::io;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::CrosstermBackend, Terminal};
use tracing::debug;

use tickit::config::Config;
use tickit::error::Result;
use tickit::store::KeyValueStore;
use tickit::Tickit;

use crate::tui::focus::{FocusAction, FocusApp};

const TICK: Duration = Duration::from_secs(1);

/// Initialise and run the focus timer interface until the user quits.
/// Tasks completed from the screen go through `app` like any other completion.
pub fn run_focus_tui<S: KeyValueStore>(app: &mut Tickit<S>, config: &Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut screen = FocusApp::new(config, app.tasks());
    let result = run_loop(&mut terminal, &mut screen, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    screen: &mut FocusApp,
    app: &mut Tickit<S>,
) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| screen.render(f))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match screen.handle_key(key) {
                    FocusAction::Quit => return Ok(()),
                    FocusAction::Complete(id) => {
                        let change = app.complete_task(id, Utc::now())?;
                        debug!(id = %id, reward = ?change.reward, "completed from focus screen");
                        let msg = match change.reward {
                            Some(xp) => format!("Completed {} (+{xp} XP)", change.task.title),
                            None => format!("Completed {}", change.task.title),
                        };
                        screen.set_status_message(msg);
                        screen.refresh_targets(app.tasks());
                    }
                    FocusAction::None => {}
                }
            }
        }

        while last_tick.elapsed() >= TICK {
            screen.tick();
            last_tick += TICK;
        }
    }
}
