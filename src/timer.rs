//! Pomodoro-style focus timer.
//!
//! The timer is a plain state machine driven by `tick`; the caller decides how
//! often a second elapses. Work and break sessions hand over to each other when
//! they run out, a custom session just stops.

use std::fmt;

use tracing::debug;

use crate::error::{Result, TickitError};
use crate::fields::Status;
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Work,
    Break,
    Custom,
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimerMode::Work => "Focus",
            TimerMode::Break => "Break",
            TimerMode::Custom => "Custom",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTimer {
    mode: TimerMode,
    remaining: u32,
    active: bool,
    work_secs: u32,
    break_secs: u32,
    custom_secs: u32,
}

impl Default for FocusTimer {
    fn default() -> Self {
        FocusTimer::new(25, 5)
    }
}

impl FocusTimer {
    /// A paused work session. Zero lengths are raised to one minute.
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        let work_secs = work_minutes.max(1).saturating_mul(60);
        let break_secs = break_minutes.max(1).saturating_mul(60);
        FocusTimer {
            mode: TimerMode::Work,
            remaining: work_secs,
            active: false,
            work_secs,
            break_secs,
            custom_secs: work_secs,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Full length of the current mode, in seconds.
    pub fn length(&self) -> u32 {
        match self.mode {
            TimerMode::Work => self.work_secs,
            TimerMode::Break => self.break_secs,
            TimerMode::Custom => self.custom_secs,
        }
    }

    /// Fraction of the current session already elapsed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let len = self.length();
        if len == 0 {
            return 0.0;
        }
        (len - self.remaining.min(len)) as f64 / len as f64
    }

    pub fn start(&mut self) {
        if self.remaining > 0 {
            self.active = true;
        }
    }

    pub fn pause(&mut self) {
        self.active = false;
    }

    pub fn toggle(&mut self) {
        if self.active {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stop and restore the current mode's full length.
    pub fn reset(&mut self) {
        self.active = false;
        self.remaining = self.length();
    }

    /// Switch to a custom session of `minutes`, paused.
    pub fn set_custom(&mut self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Err(TickitError::InvalidInput(
                "custom length must be at least one minute".into(),
            ));
        }
        self.custom_secs = minutes.saturating_mul(60);
        self.mode = TimerMode::Custom;
        self.remaining = self.custom_secs;
        self.active = false;
        Ok(())
    }

    /// Parse and apply a custom length typed by the user.
    pub fn set_custom_str(&mut self, input: &str) -> Result<()> {
        let input = input.trim();
        let minutes = input.parse::<u32>().map_err(|_| {
            TickitError::InvalidInput(format!("'{input}' is not a whole number of minutes"))
        })?;
        self.set_custom(minutes)
    }

    /// Advance one second. Returns the mode that just finished, if any.
    pub fn tick(&mut self) -> Option<TimerMode> {
        if !self.active {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return None;
        }
        let finished = self.mode;
        self.active = false;
        match finished {
            TimerMode::Work => {
                self.mode = TimerMode::Break;
                self.remaining = self.break_secs;
            }
            TimerMode::Break => {
                self.mode = TimerMode::Work;
                self.remaining = self.work_secs;
            }
            TimerMode::Custom => {}
        }
        debug!(finished = %finished, next = %self.mode, "focus session finished");
        Some(finished)
    }
}

/// Tasks worth focusing on: not completed and HIGH or URGENT.
pub fn focus_targets(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.status != Status::Completed && t.priority.is_focus())
        .collect()
}

/// `m:ss`, minutes unpadded.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
