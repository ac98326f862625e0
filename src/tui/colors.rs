//! Color constants for the terminal user interface.

use ratatui::style::Color;

use tickit::fields::Priority;
use tickit::timer::TimerMode;

/// Work sessions
pub const FOCUS_RED: Color = Color::Rgb(239, 68, 68);
/// Breaks
pub const BREAK_GREEN: Color = Color::Rgb(16, 185, 129);
/// Custom-length sessions
pub const CUSTOM_INDIGO: Color = Color::Rgb(99, 102, 241);
pub const URGENT_ROSE: Color = Color::Rgb(225, 29, 72);
pub const HIGH_ORANGE: Color = Color::Rgb(249, 115, 22);

pub fn mode_color(mode: TimerMode) -> Color {
    match mode {
        TimerMode::Work => FOCUS_RED,
        TimerMode::Break => BREAK_GREEN,
        TimerMode::Custom => CUSTOM_INDIGO,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Urgent => URGENT_ROSE,
        Priority::High => HIGH_ORANGE,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Gray,
    }
}
