//! Runtime configuration.
//!
//! Values come from command-line flags first, then environment variables,
//! then built-in defaults:
//!
//! | Setting            | Variable                                 | Default                  |
//! |--------------------|------------------------------------------|--------------------------|
//! | data directory     | `TICKIT_DIR`                             | `~/.tickit`              |
//! | first-run name     | `TICKIT_USER`                            | `Tickit User`            |
//! | suggestion API key | `GEMINI_API_KEY`, `API_KEY`              | none (offline)           |
//! | suggestion model   | `TICKIT_MODEL`                           | `gemini-3-flash-preview` |
//! | suggestion timeout | `TICKIT_SUGGEST_TIMEOUT` (seconds)       | 15                       |
//! | focus lengths      | `TICKIT_WORK_MINUTES`, `TICKIT_BREAK_MINUTES` | 25 / 5              |
//! | leveling           | `TICKIT_LEVELING` (`single`/`cascade`)   | `single`                 |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, TickitError};
use crate::progression::LevelingPolicy;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_USER_NAME: &str = "Tickit User";

/// Resolved settings for one run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding the JSON store files.
    pub data_dir: PathBuf,
    /// Display name given to a freshly created profile.
    pub user_name: String,
    /// Key for the suggestion API; `None` disables remote suggestions.
    pub api_key: Option<String>,
    pub model: String,
    pub suggest_timeout: Duration,
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub leveling: LevelingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Config {
            data_dir: PathBuf::from(home).join(".tickit"),
            user_name: DEFAULT_USER_NAME.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            suggest_timeout: Duration::from_secs(15),
            work_minutes: 25,
            break_minutes: 5,
            leveling: LevelingPolicy::Single,
        }
    }
}

impl Config {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Config::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(dir) = get("TICKIT_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(name) = get("TICKIT_USER") {
            cfg.user_name = name;
        }
        cfg.api_key = get("GEMINI_API_KEY").or_else(|| get("API_KEY"));
        if let Some(model) = get("TICKIT_MODEL") {
            cfg.model = model;
        }
        if let Some(secs) = get("TICKIT_SUGGEST_TIMEOUT") {
            let secs = parse_positive("TICKIT_SUGGEST_TIMEOUT", &secs)?;
            cfg.suggest_timeout = Duration::from_secs(secs as u64);
        }
        if let Some(m) = get("TICKIT_WORK_MINUTES") {
            cfg.work_minutes = parse_positive("TICKIT_WORK_MINUTES", &m)?;
        }
        if let Some(m) = get("TICKIT_BREAK_MINUTES") {
            cfg.break_minutes = parse_positive("TICKIT_BREAK_MINUTES", &m)?;
        }
        if let Some(policy) = get("TICKIT_LEVELING") {
            cfg.leveling = LevelingPolicy::from_str(&policy)?;
        }
        Ok(cfg)
    }

    /// Override the data directory (the `--dir` flag).
    pub fn data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = dir;
        self
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TickitError::Config(format!("{key} must be a positive integer, got '{value}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert!(cfg.data_dir.ends_with(".tickit"));
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.work_minutes, 25);
        assert_eq!(cfg.break_minutes, 5);
        assert_eq!(cfg.leveling, LevelingPolicy::Single);
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("TICKIT_DIR", "/tmp/tk"),
            ("API_KEY", "fallback-key"),
            ("TICKIT_WORK_MINUTES", "50"),
            ("TICKIT_LEVELING", "cascade"),
            ("TICKIT_SUGGEST_TIMEOUT", "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/tk"));
        assert_eq!(cfg.api_key.as_deref(), Some("fallback-key"));
        assert_eq!(cfg.work_minutes, 50);
        assert_eq!(cfg.leveling, LevelingPolicy::Cascade);
        assert_eq!(cfg.suggest_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_gemini_key_wins_over_generic_key() {
        let cfg =
            Config::from_lookup(lookup(&[("API_KEY", "a"), ("GEMINI_API_KEY", "g")])).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("g"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("TICKIT_BREAK_MINUTES", "0")])),
            Err(TickitError::Config(_))
        ));
        assert!(Config::from_lookup(lookup(&[("TICKIT_LEVELING", "sometimes")])).is_err());
    }

    #[test]
    fn test_flag_overrides_dir() {
        let cfg = Config::from_lookup(lookup(&[("TICKIT_DIR", "/a")]))
            .unwrap()
            .data_dir(PathBuf::from("/b"));
        assert_eq!(cfg.data_dir, PathBuf::from("/b"));
    }
}
