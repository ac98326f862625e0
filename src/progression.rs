//! XP, leveling, streak and badge rules.
//!
//! Every operation here is pure: it takes the current profile and returns the
//! next one, leaving persistence and notification to the caller.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, info, warn};

use crate::error::TickitError;
use crate::profile::{Badge, UserProfile};

/// How a single XP grant crosses level thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelingPolicy {
    /// At most one level per grant; overflow stays in `xp`.
    #[default]
    Single,
    /// Keep leveling until `xp` is below the current threshold.
    Cascade,
}

impl FromStr for LevelingPolicy {
    type Err = TickitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(LevelingPolicy::Single),
            "cascade" => Ok(LevelingPolicy::Cascade),
            other => Err(TickitError::Config(format!(
                "unknown leveling policy '{other}', expected 'single' or 'cascade'"
            ))),
        }
    }
}

/// Condition under which a badge unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRule {
    CompletedTasks(u32),
    Level(u32),
    Streak(u32),
}

impl BadgeRule {
    pub fn is_met(&self, profile: &UserProfile) -> bool {
        match *self {
            BadgeRule::CompletedTasks(n) => profile.completed_tasks >= n,
            BadgeRule::Level(n) => profile.level >= n,
            BadgeRule::Streak(n) => profile.streak >= n,
        }
    }
}

impl fmt::Display for BadgeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadgeRule::CompletedTasks(1) => write!(f, "complete your first task"),
            BadgeRule::CompletedTasks(n) => write!(f, "complete {n} tasks"),
            BadgeRule::Level(n) => write!(f, "reach level {n}"),
            BadgeRule::Streak(n) => write!(f, "keep a {n}-day streak"),
        }
    }
}

/// Catalog entry describing an unlockable badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub rule: BadgeRule,
}

impl BadgeSpec {
    fn locked(&self) -> Badge {
        Badge {
            id: self.id.to_string(),
            name: self.name.to_string(),
            icon: self.icon.to_string(),
            unlocked_at: None,
        }
    }
}

/// Badges every profile can earn.
pub const DEFAULT_BADGES: &[BadgeSpec] = &[
    BadgeSpec {
        id: "early-bird",
        name: "Early Bird",
        icon: "☀️",
        rule: BadgeRule::CompletedTasks(1),
    },
    BadgeSpec {
        id: "on-a-roll",
        name: "On a Roll",
        icon: "🔥",
        rule: BadgeRule::Streak(3),
    },
    BadgeSpec {
        id: "week-warrior",
        name: "Week Warrior",
        icon: "📅",
        rule: BadgeRule::Streak(7),
    },
    BadgeSpec {
        id: "rising-star",
        name: "Rising Star",
        icon: "⭐",
        rule: BadgeRule::Level(5),
    },
    BadgeSpec {
        id: "task-master",
        name: "Task Master",
        icon: "🎯",
        rule: BadgeRule::CompletedTasks(25),
    },
    BadgeSpec {
        id: "centurion",
        name: "Centurion",
        icon: "🏆",
        rule: BadgeRule::CompletedTasks(100),
    },
];

/// Result of crediting XP.
#[derive(Debug, Clone, PartialEq)]
pub struct XpGrant {
    pub profile: UserProfile,
    pub levels_gained: u32,
}

/// What a streak evaluation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakOutcome {
    /// Same calendar day as the last evaluation.
    Unchanged,
    /// Exactly one day later; streak extended.
    Extended,
    /// A day or more was skipped; streak restarted at 1.
    Reset,
    /// `last_active` is in the future; streak kept, timestamp clamped.
    ClockSkew,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreakUpdate {
    pub profile: UserProfile,
    pub outcome: StreakOutcome,
}

/// Applies progression rules to a profile.
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    policy: LevelingPolicy,
    catalog: Vec<BadgeSpec>,
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new(LevelingPolicy::default())
    }
}

impl ProgressionEngine {
    pub fn new(policy: LevelingPolicy) -> Self {
        ProgressionEngine {
            policy,
            catalog: DEFAULT_BADGES.to_vec(),
        }
    }

    /// Replace the badge catalog.
    pub fn with_badges(mut self, catalog: &[BadgeSpec]) -> Self {
        self.catalog = catalog.to_vec();
        self
    }

    pub fn catalog(&self) -> &[BadgeSpec] {
        &self.catalog
    }

    /// Credit `amount` XP for one completed task.
    ///
    /// `completed_tasks` always increases by one. The threshold for leaving a
    /// level is `level * 100`, measured against the level held before the grant.
    pub fn grant_xp(&self, profile: &UserProfile, amount: u32) -> XpGrant {
        let mut next = profile.clone();
        next.xp = next.xp.saturating_add(amount);
        next.completed_tasks = next.completed_tasks.saturating_add(1);

        let mut levels_gained = 0;
        while next.xp >= next.level_threshold() {
            next.xp -= next.level_threshold();
            next.level += 1;
            levels_gained += 1;
            if self.policy == LevelingPolicy::Single {
                break;
            }
        }

        debug!(amount, level = next.level, xp = next.xp, "granted xp");
        if levels_gained > 0 {
            info!(level = next.level, "level up");
        }
        XpGrant {
            profile: next,
            levels_gained,
        }
    }

    /// Continue, restart or keep the daily streak.
    ///
    /// Days are compared as calendar dates in `now`'s timezone, so two calls on
    /// the same date never change anything.
    pub fn evaluate_streak<Tz: TimeZone>(
        &self,
        profile: &UserProfile,
        now: &DateTime<Tz>,
    ) -> StreakUpdate {
        let mut next = profile.clone();
        let now_utc = now.with_timezone(&Utc);

        if profile.last_active > now_utc {
            warn!(
                last_active = %profile.last_active,
                now = %now_utc,
                "last activity is in the future, keeping streak"
            );
            next.last_active = now_utc;
            return StreakUpdate {
                profile: next,
                outcome: StreakOutcome::ClockSkew,
            };
        }

        let last_day = profile.last_active.with_timezone(&now.timezone()).date_naive();
        let days = (now.date_naive() - last_day).num_days();
        let outcome = match days {
            0 => StreakOutcome::Unchanged,
            1 => {
                next.streak = next.streak.saturating_add(1);
                next.last_active = now_utc;
                StreakOutcome::Extended
            }
            _ => {
                next.streak = 1;
                next.last_active = now_utc;
                StreakOutcome::Reset
            }
        };
        debug!(days, streak = next.streak, ?outcome, "evaluated streak");
        StreakUpdate {
            profile: next,
            outcome,
        }
    }

    /// Append any catalog badges the profile does not carry yet, locked.
    pub fn sync_badges(&self, profile: &UserProfile) -> UserProfile {
        let mut next = profile.clone();
        for spec in &self.catalog {
            if next.badge(spec.id).is_none() {
                next.badges.push(spec.locked());
            }
        }
        next
    }

    /// Unlock every catalog badge whose rule the profile now satisfies.
    ///
    /// Returns the updated profile and the badges unlocked by this call.
    /// Unlocked badges stay unlocked.
    pub fn evaluate_badges(
        &self,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> (UserProfile, Vec<Badge>) {
        let mut next = self.sync_badges(profile);
        let mut unlocked = Vec::new();
        for spec in &self.catalog {
            if !spec.rule.is_met(&next) {
                continue;
            }
            if let Some(badge) = next
                .badges
                .iter_mut()
                .find(|b| b.id == spec.id && !b.is_unlocked())
            {
                badge.unlocked_at = Some(now);
                info!(badge = spec.id, "badge unlocked");
                unlocked.push(badge.clone());
            }
        }
        (next, unlocked)
    }

    /// Rule for a badge id, if it is in the catalog.
    pub fn rule_for(&self, id: &str) -> Option<BadgeRule> {
        self.catalog.iter().find(|s| s.id == id).map(|s| s.rule)
    }
}
