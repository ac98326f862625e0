//! Focus timer screen.
//!
//! Shows the running timer next to the open HIGH and URGENT tasks. Key
//! handling and drawing are kept free of terminal I/O so both can be driven
//! from tests; `focus_run` owns the terminal and the clock.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use uuid::Uuid;

use tickit::config::Config;
use tickit::fields::Priority;
use tickit::task::Task;
use tickit::timer::{focus_targets, format_clock, FocusTimer, TimerMode};

use crate::tui::colors::{mode_color, priority_color};
use crate::tui::input::InputField;

const HELP: &str =
    "Space: Start/Pause | r: Reset | c: Custom | Up/Down: Select | Enter: Complete | q: Quit";

/// What the run loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusAction {
    None,
    Quit,
    Complete(Uuid),
}

#[derive(Debug, Clone)]
struct Target {
    id: Uuid,
    title: String,
    priority: Priority,
}

pub struct FocusApp {
    timer: FocusTimer,
    targets: Vec<Target>,
    selected: usize,
    custom_input: InputField,
    status_message: String,
}

impl FocusApp {
    pub fn new(config: &Config, tasks: &[Task]) -> Self {
        let mut app = FocusApp {
            timer: FocusTimer::new(config.work_minutes, config.break_minutes),
            targets: Vec::new(),
            selected: 0,
            custom_input: InputField::with_limit(3),
            status_message: String::new(),
        };
        app.refresh_targets(tasks);
        app
    }

    /// Rebuild the target list, keeping the selection in range.
    pub fn refresh_targets(&mut self, tasks: &[Task]) {
        self.targets = focus_targets(tasks)
            .into_iter()
            .map(|t| Target {
                id: t.id,
                title: t.title.clone(),
                priority: t.priority,
            })
            .collect();
        if self.selected >= self.targets.len() {
            self.selected = self.targets.len().saturating_sub(1);
        }
    }

    pub fn selected_target(&self) -> Option<Uuid> {
        self.targets.get(self.selected).map(|t| t.id)
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// One second of wall-clock time has passed.
    pub fn tick(&mut self) {
        if let Some(finished) = self.timer.tick() {
            let msg = match finished {
                TimerMode::Work => "Focus session done. Time for a break.",
                TimerMode::Break => "Break over. Ready to focus?",
                TimerMode::Custom => "Custom session done.",
            };
            self.set_status_message(msg);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FocusAction {
        if self.custom_input.active {
            match key.code {
                KeyCode::Esc => self.custom_input.cancel(),
                KeyCode::Enter => {
                    let typed = self.custom_input.take();
                    match self.timer.set_custom_str(&typed) {
                        Ok(()) => {
                            self.set_status_message(format!("Custom session: {} min", typed.trim()))
                        }
                        Err(e) => self.set_status_message(e.to_string()),
                    }
                }
                KeyCode::Backspace => self.custom_input.handle_backspace(),
                KeyCode::Delete => self.custom_input.handle_delete(),
                KeyCode::Left => self.custom_input.move_cursor_left(),
                KeyCode::Right => self.custom_input.move_cursor_right(),
                KeyCode::Char(c) if c.is_ascii_digit() => self.custom_input.handle_char(c),
                _ => {}
            }
            return FocusAction::None;
        }

        self.status_message.clear();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                FocusAction::Quit
            }
            KeyCode::Char('q') | KeyCode::Esc => FocusAction::Quit,
            KeyCode::Char(' ') => {
                self.timer.toggle();
                FocusAction::None
            }
            KeyCode::Char('r') => {
                self.timer.reset();
                FocusAction::None
            }
            KeyCode::Char('c') => {
                self.custom_input.open();
                FocusAction::None
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                FocusAction::None
            }
            KeyCode::Down => {
                if self.selected + 1 < self.targets.len() {
                    self.selected += 1;
                }
                FocusAction::None
            }
            KeyCode::Enter => match self.selected_target() {
                Some(id) => FocusAction::Complete(id),
                None => {
                    self.set_status_message("No focus targets.");
                    FocusAction::None
                }
            },
            _ => FocusAction::None,
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(5), // Clock
                Constraint::Length(3), // Progress
                Constraint::Min(0),    // Targets
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_clock(f, chunks[1]);
        self.render_progress(f, chunks[2]);
        self.render_targets(f, chunks[3]);
        self.render_status_bar(f, chunks[4]);

        if self.custom_input.active {
            self.render_custom_popup(f);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let color = mode_color(self.timer.mode());
        let state = if self.timer.is_active() {
            "running"
        } else {
            "paused"
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled("FOCUS", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("{} ({state})", self.timer.mode()),
                Style::default().fg(color).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_clock(&self, f: &mut Frame, area: Rect) {
        let color = mode_color(self.timer.mode());
        let clock = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format_clock(self.timer.remaining()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(clock, area);
    }

    fn render_progress(&self, f: &mut Frame, area: Rect) {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(mode_color(self.timer.mode())))
            .ratio(self.timer.progress().clamp(0.0, 1.0));
        f.render_widget(gauge, area);
    }

    fn render_targets(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = if self.targets.is_empty() {
            vec![Line::from(Span::styled(
                "Nothing urgent. Enjoy the calm.",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.targets
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let selected = i == self.selected;
                    let marker = if selected { "> " } else { "  " };
                    let title_style = if selected {
                        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    Line::from(vec![
                        Span::raw(marker),
                        Span::styled(
                            format!("{:<7}", format!("{:?}", t.priority)),
                            Style::default().fg(priority_color(t.priority)),
                        ),
                        Span::raw(" "),
                        Span::styled(t.title.clone(), title_style),
                    ])
                })
                .collect()
        };
        let list = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Focus targets ({}) ", self.targets.len())),
        );
        f.render_widget(list, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if self.status_message.is_empty() {
            HELP.to_string()
        } else {
            self.status_message.clone()
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(mode_color(self.timer.mode())).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render_custom_popup(&self, f: &mut Frame) {
        let area = centered_rect(40, 5, f.area());
        f.render_widget(Clear, area);
        let popup = Paragraph::new(vec![
            Line::from(format!("{}_", self.custom_input.value)),
            Line::from(Span::styled(
                "Enter: Apply | Esc: Cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Minutes "));
        f.render_widget(popup, area);
    }
}

/// A `width` x `height` rectangle centred in `area`, clipped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(area.x + (area.width - w) / 2, area.y + (area.height - h) / 2, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use ratatui::{backend::TestBackend, Terminal};
    use tickit::fields::Status;
    use tickit::task::TaskDraft;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn tasks() -> Vec<Task> {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let make = |title: &str, p: Priority| {
            let mut d = TaskDraft::titled(title);
            d.priority = Some(p);
            Task::from_draft(d, today, Utc::now())
        };
        let mut done = make("Shipped", Priority::Urgent);
        done.status = Status::Completed;
        vec![
            make("Deploy", Priority::Urgent),
            make("Groceries", Priority::Low),
            make("Review", Priority::High),
            done,
        ]
    }

    fn config() -> Config {
        Config {
            work_minutes: 1,
            break_minutes: 1,
            ..Config::default()
        }
    }

    fn screen(app: &FocusApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_targets_are_open_high_and_urgent() {
        let app = FocusApp::new(&config(), &tasks());
        let titles: Vec<&str> = app.targets.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Deploy", "Review"]);
    }

    #[test]
    fn test_space_toggles_and_tick_counts_down() {
        let mut app = FocusApp::new(&config(), &[]);
        assert_eq!(app.handle_key(key(KeyCode::Char(' '))), FocusAction::None);
        assert!(app.timer.is_active());
        app.tick();
        assert_eq!(app.timer.remaining(), 59);
        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.timer.remaining(), 60);
        assert!(!app.timer.is_active());
    }

    #[test]
    fn test_finished_session_sets_message() {
        let mut app = FocusApp::new(&config(), &[]);
        app.handle_key(key(KeyCode::Char(' ')));
        for _ in 0..60 {
            app.tick();
        }
        assert_eq!(app.timer.mode(), TimerMode::Break);
        assert!(app.status_message.contains("break"));
    }

    #[test]
    fn test_custom_minutes_prompt() {
        let mut app = FocusApp::new(&config(), &[]);
        app.handle_key(key(KeyCode::Char('c')));
        assert!(app.custom_input.active);
        app.handle_key(key(KeyCode::Char('1')));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Char('5')));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.custom_input.active);
        assert_eq!(app.timer.mode(), TimerMode::Custom);
        assert_eq!(app.timer.remaining(), 15 * 60);

        app.handle_key(key(KeyCode::Char('c')));
        app.handle_key(key(KeyCode::Char('0')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.timer.remaining(), 15 * 60);
        assert!(app.status_message.contains("invalid input"));
    }

    #[test]
    fn test_selection_and_complete() {
        let tasks = tasks();
        let mut app = FocusApp::new(&config(), &tasks);
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.handle_key(key(KeyCode::Enter)), FocusAction::Complete(tasks[2].id));

        app.refresh_targets(&tasks[..1]);
        assert_eq!(app.selected_target(), Some(tasks[0].id));
        app.refresh_targets(&[]);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), FocusAction::None);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = FocusApp::new(&config(), &[]);
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), FocusAction::Quit);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), FocusAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), FocusAction::Quit);
    }

    #[test]
    fn test_render_shows_clock_and_targets() {
        let app = FocusApp::new(&config(), &tasks());
        let text = screen(&app);
        assert!(text.contains("1:00"));
        assert!(text.contains("Deploy"));
        assert!(text.contains("Focus targets (2)"));
        assert!(!text.contains("Groceries"));
    }
}
