//! # Tickit
//!
//! Core of a gamified personal task manager. Tasks earn XP when completed,
//! XP fills levels, consecutive active days build a streak and milestones
//! unlock badges.
//!
//! - [`repository`] keeps the ordered task collection and its queries.
//! - [`progression`] holds the pure XP, level, streak and badge rules.
//! - [`app::Tickit`] ties both to a [`store::KeyValueStore`] and publishes
//!   [`events::AppEvent`]s for every change.
//! - [`timer`] is the focus timer state machine.
//! - [`suggest`] and [`gemini`] provide optional, best-effort text suggestions.
//!
//! State is stored as two JSON documents, `tickit-tasks` and `tickit-user`,
//! in `~/.tickit/` unless configured otherwise (see [`config`]).

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fields;
pub mod gemini;
pub mod profile;
pub mod progression;
pub mod repository;
pub mod stats;
pub mod store;
pub mod suggest;
pub mod task;
pub mod timer;

pub use app::Tickit;
pub use error::{Result, TickitError};
