use crate::cli::{ClockArgs, Commands, ConfigActions};
use crate::command::Extractor;
use crate::config::{get_config_path, Config};
use crate::runner::Runner;
use crate::time_zone::TimeZoneId;
use crate::tracker::MemoryTracker;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Datelike, Utc};
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

pub struct Application {
    config: Config,
    config_path: PathBuf,
}

impl Application {
    /// Load configuration from `config_path` (or the default location) and
    /// apply environment overrides.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => get_config_path()?,
        };
        let mut config = Config::load_from(&config_path)?;
        config.apply_env_overrides()?;
        debug!("Loaded configuration from {}", config_path.display());
        Ok(Self { config, config_path })
    }

    pub fn with_config(config: Config, config_path: PathBuf) -> Self {
        Self { config, config_path }
    }

    pub fn run(&self, command: Commands, out: &mut impl Write) -> Result<()> {
        match command {
            Commands::Extract { file, short_dates } => {
                let text = read_input(file.as_deref())?;
                let extractor =
                    self.extractor(Utc::now(), self.config.deadline.time_zone, short_dates);
                match extractor.extract(&text) {
                    Some(deadline) => writeln!(out, "{}", deadline.format("%Y-%m-%d %H:%M"))?,
                    None => writeln!(out, "no deadline")?,
                }
            }
            Commands::Label { file, clock } => {
                let text = read_input(file.as_deref())?;
                let (now, time_zone) = self.resolve_clock(&clock)?;
                let extractor = self.extractor(now, time_zone, false);
                match extractor.extract(&text) {
                    Some(deadline) => {
                        let mut classifier = self.config.classifier();
                        classifier.time_zone = time_zone;
                        writeln!(out, "{}", classifier.classify(deadline, now))?;
                    }
                    None => writeln!(out, "no deadline")?,
                }
            }
            Commands::Apply { issues, clock, dry_run } => {
                let (now, time_zone) = self.resolve_clock(&clock)?;
                let mut classifier = self.config.classifier();
                classifier.time_zone = time_zone;

                let mut runner = Runner::new(MemoryTracker::load(&issues)?, classifier)
                    .with_label_color(self.config.labels.color.clone())
                    .with_short_dates(self.config.deadline.allow_short_dates);
                let summary = runner.update_labels(now)?;

                for (number, label) in &summary.labeled {
                    writeln!(out, "#{}: {}", number, label)?;
                }
                info!(
                    "{} labeled, {} unchanged, {} without deadline",
                    summary.labeled.len(),
                    summary.unchanged,
                    summary.skipped
                );

                if dry_run {
                    info!("Dry run; {} left untouched", issues.display());
                } else {
                    runner.into_tracker().save(&issues)?;
                }
            }
            Commands::Config { action } => match action {
                ConfigActions::Show => write!(out, "{}", toml::to_string_pretty(&self.config)?)?,
                ConfigActions::Path => writeln!(out, "{}", self.config_path.display())?,
            },
        }
        Ok(())
    }

    fn extractor(
        &self,
        now: DateTime<Utc>,
        time_zone: TimeZoneId,
        short_dates: bool,
    ) -> Extractor {
        if short_dates || self.config.deadline.allow_short_dates {
            Extractor::with_default_year(time_zone.local_date(now).year())
        } else {
            Extractor::new()
        }
    }

    /// Command-line values win over configuration.
    fn resolve_clock(&self, clock: &ClockArgs) -> Result<(DateTime<Utc>, TimeZoneId)> {
        let now = match &clock.now {
            Some(now) => DateTime::parse_from_rfc3339(now)
                .with_context(|| format!("Invalid --now value '{}'", now))?
                .with_timezone(&Utc),
            None => Utc::now(),
        };
        let time_zone = match &clock.time_zone {
            Some(zone) => zone
                .parse::<TimeZoneId>()
                .with_context(|| format!("Invalid --time-zone '{}'", zone))?,
            None => self.config.deadline.time_zone,
        };
        Ok((now, time_zone))
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| anyhow!("Failed to read stdin: {}", e))?;
            Ok(text)
        }
    }
}
