//! The single user profile that accumulates XP, levels, streaks and badges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progression state for the local user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub level: u32,
    pub xp: u32,
    pub completed_tasks: u32,
    pub joined_date: DateTime<Utc>,
    pub streak: u32,
    pub last_active: DateTime<Utc>,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

/// An achievement marker. Locked while `unlocked_at` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Badge {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

impl UserProfile {
    /// Fresh profile for a first run. Today counts as the first active day.
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        UserProfile {
            id: "user-1".to_string(),
            name: name.into(),
            avatar: String::new(),
            level: 1,
            xp: 0,
            completed_tasks: 0,
            joined_date: now,
            streak: 1,
            last_active: now,
            badges: Vec::new(),
        }
    }

    /// XP needed to leave the current level.
    pub fn level_threshold(&self) -> u32 {
        self.level.saturating_mul(100)
    }

    /// Fraction of the current level completed, in `[0, 1]`.
    pub fn level_progress(&self) -> f64 {
        let threshold = self.level_threshold();
        if threshold == 0 {
            return 0.0;
        }
        (self.xp as f64 / threshold as f64).min(1.0)
    }

    /// XP earned over the profile's lifetime: every passed threshold plus current XP.
    pub fn lifetime_xp(&self) -> u64 {
        let passed = self.level.saturating_sub(1) as u64;
        // 100 * (1 + 2 + ... + passed)
        50 * passed * (passed + 1) + self.xp as u64
    }

    pub fn badge(&self, id: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn unlocked_badges(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter().filter(|b| b.is_unlocked())
    }
}
