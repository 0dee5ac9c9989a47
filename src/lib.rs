//! Deadline labels for issues.
//!
//! [`command::extract`] finds the deadline set by the last `/deadline` command
//! in an issue body or comment, and [`label::classify`] turns that deadline
//! into a [`DeadlineLabel`] such as `deadline: 3 days`. The remaining modules
//! apply those labels to a set of issues from the command line.

pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod label;
pub mod runner;
pub mod time_zone;
pub mod tracker;

use std::io::Write;

/// Initialize logging from `RUST_LOG`, defaulting to `info`.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use chrono::Local;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

// Re-export commonly used types
pub use command::{extract, Extractor};
pub use config::Config;
pub use label::{classify, Classifier, DeadlineLabel, WeekStart};
pub use time_zone::TimeZoneId;
