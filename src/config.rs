use crate::label::{Classifier, WeekStart};
use crate::runner::DEFAULT_LABEL_COLOR;
use crate::time_zone::TimeZoneId;
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const TIME_ZONE_ENV: &str = "DEADLINE_TIME_ZONE";
pub const WEEK_START_ENV: &str = "DEADLINE_WEEK_START";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub deadline: DeadlineConfig,
    #[serde(default)]
    pub labels: LabelConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineConfig {
    /// Zone deadline commands are written in.
    #[serde(default)]
    pub time_zone: TimeZoneId,
    #[serde(default)]
    pub week_start: WeekStart,
    /// Accept `/deadline MM/dd`, completing the year from the current date.
    #[serde(default)]
    pub allow_short_dates: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Hex color for labels created by the runner.
    pub color: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self { color: DEFAULT_LABEL_COLOR.to_string() }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Read the config at `path`, writing the defaults there first when the
    /// file does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Config::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Override settings from `DEADLINE_TIME_ZONE` and `DEADLINE_WEEK_START`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|name| env::var(name).ok())
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(TIME_ZONE_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("Using time zone '{}' from {}", value, TIME_ZONE_ENV);
            self.deadline.time_zone =
                value.parse().with_context(|| format!("Invalid {}", TIME_ZONE_ENV))?;
        }
        if let Some(value) = lookup(WEEK_START_ENV).filter(|v| !v.trim().is_empty()) {
            self.deadline.week_start = match value.trim().to_lowercase().as_str() {
                "sunday" => WeekStart::Sunday,
                "monday" => WeekStart::Monday,
                other => return Err(anyhow!("Invalid {}: '{}'", WEEK_START_ENV, other)),
            };
        }
        Ok(())
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.deadline.time_zone).with_week_start(self.deadline.week_start)
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "ducktape", "deadline-labeler")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}
