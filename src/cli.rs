use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// deadline-labeler - label issues by how close their /deadline is
#[derive(Debug, Parser)]
#[command(name = "deadline-labeler")]
#[command(about = "Label issues by how close their /deadline command is", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the deadline set by the last /deadline command in the text
    Extract {
        /// Text file to scan (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Accept MM/dd dates in the current year
        #[arg(long)]
        short_dates: bool,
    },

    /// Print the deadline label for the text
    Label {
        /// Text file to scan (reads stdin when omitted)
        file: Option<PathBuf>,

        #[command(flatten)]
        clock: ClockArgs,
    },

    /// Update deadline labels on every open issue in an issues file
    Apply {
        /// JSON file with `labels` and `issues`
        #[arg(required = true)]
        issues: PathBuf,

        #[command(flatten)]
        clock: ClockArgs,

        /// Report changes without writing the issues file
        #[arg(long)]
        dry_run: bool,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

#[derive(Debug, Args)]
pub struct ClockArgs {
    /// Current time as RFC 3339 (defaults to the system clock)
    #[arg(long)]
    pub now: Option<String>,

    /// Time zone deadlines are written in, e.g. Asia/Tokyo or +09:00
    #[arg(long = "time-zone")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigActions {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,
}
