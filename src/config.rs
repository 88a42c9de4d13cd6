use anyhow::{Context, Result};
use std::path::PathBuf;

pub const ENV_STATE: &str = "WEALTHTRACK_STATE";
pub const ENV_LOG: &str = "WEALTHTRACK_LOG";
pub const ENV_LOG_FORMAT: &str = "WEALTHTRACK_LOG_FORMAT";
pub const ENV_REMINDER_DAYS: &str = "WEALTHTRACK_REMINDER_DAYS";

const DEFAULT_LOG_FILTER: &str = "warn";
const DEFAULT_REMINDER_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub state_path: PathBuf,
    pub log_filter: String,
    pub log_format: LogFormat,
    pub reminder_days: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`, falling back to defaults for unset
    /// or blank keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let state_path = match get(ENV_STATE) {
            Some(path) => PathBuf::from(crate::input::expand_home(&path)),
            None => default_state_path()?,
        };
        let reminder_days = match get(ENV_REMINDER_DAYS) {
            Some(days) => days
                .trim()
                .parse()
                .with_context(|| format!("{ENV_REMINDER_DAYS} must be a whole number of days, got '{days}'"))?,
            None => DEFAULT_REMINDER_DAYS,
        };

        Ok(Self {
            state_path,
            log_filter: get(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_format: get(ENV_LOG_FORMAT)
                .map(|f| LogFormat::parse(&f))
                .unwrap_or(LogFormat::Text),
            reminder_days,
        })
    }
}

fn default_state_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "wealthtrack", "WealthTrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().join("state.json"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
