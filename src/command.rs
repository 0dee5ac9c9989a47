//! `/deadline` command extraction from issue bodies and comments.
//!
//! A command is the token `/deadline` anywhere on a line, followed by a date
//! (`yyyy/MM/dd`) and an optional time (`HH:mm`). Leading zeros are optional
//! in every field except the year. When several lines carry a valid command
//! the last one wins.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const COMMAND_TOKEN: &str = "/deadline";

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})/(\d{1,2})/(\d{1,2})$").expect("valid date pattern"));
static SHORT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})$").expect("valid short date pattern"));
static TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2})$").expect("valid time pattern"));

/// Why a line produced no deadline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("line does not contain a /deadline command")]
    NoCommand,
    #[error("/deadline command is missing a date")]
    MissingDate,
    #[error("invalid date: '{0}'")]
    InvalidDate(String),
    #[error("invalid time: '{0}'")]
    InvalidTime(String),
}

/// Scans text for deadline commands.
///
/// The default extractor only accepts full `yyyy/MM/dd` dates. With a default
/// year set, a short `MM/dd` date is completed with that year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extractor {
    default_year: Option<i32>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_year(year: i32) -> Self {
        Self { default_year: Some(year) }
    }

    /// Return the deadline set by the last valid command in `text`.
    pub fn extract(&self, text: &str) -> Option<NaiveDateTime> {
        text.lines()
            .enumerate()
            .filter_map(|(index, line)| match self.parse_line(line) {
                Ok(deadline) => Some(deadline),
                Err(CommandError::NoCommand) => None,
                Err(err) => {
                    debug!("Ignoring command on line {}: {}", index + 1, err);
                    None
                }
            })
            .last()
    }

    /// Parse a single line into a deadline.
    pub fn parse_line(&self, line: &str) -> Result<NaiveDateTime, CommandError> {
        let mut tokens = line.split_whitespace();
        if !tokens.any(|token| token == COMMAND_TOKEN) {
            return Err(CommandError::NoCommand);
        }

        let date = tokens.next().ok_or(CommandError::MissingDate)?;
        let date = self.parse_date(date)?;
        let time = match tokens.next() {
            Some(time) => parse_time(time)?,
            None => NaiveTime::MIN,
        };
        Ok(date.and_time(time))
    }

    fn parse_date(&self, token: &str) -> Result<NaiveDate, CommandError> {
        let invalid = || CommandError::InvalidDate(token.to_string());

        let (year, month, day) = if let Some(caps) = DATE.captures(token) {
            (
                caps[1].parse::<i32>().map_err(|_| invalid())?,
                caps[2].parse::<u32>().map_err(|_| invalid())?,
                caps[3].parse::<u32>().map_err(|_| invalid())?,
            )
        } else {
            match (self.default_year, SHORT_DATE.captures(token)) {
                (Some(year), Some(caps)) => (
                    year,
                    caps[1].parse::<u32>().map_err(|_| invalid())?,
                    caps[2].parse::<u32>().map_err(|_| invalid())?,
                ),
                _ => return Err(invalid()),
            }
        };

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
    }
}

fn parse_time(token: &str) -> Result<NaiveTime, CommandError> {
    let invalid = || CommandError::InvalidTime(token.to_string());
    let caps = TIME.captures(token).ok_or_else(invalid)?;
    let hour = caps[1].parse::<u32>().map_err(|_| invalid())?;
    let minute = caps[2].parse::<u32>().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Return the deadline set by the last valid `/deadline` command in `text`,
/// or `None` when there is none.
pub fn extract(text: &str) -> Option<NaiveDateTime> {
    Extractor::new().extract(text)
}

/// Parse a single line with the strict `yyyy/MM/dd [HH:mm]` grammar.
pub fn parse_line(line: &str) -> Result<NaiveDateTime, CommandError> {
    Extractor::new().parse_line(line)
}
