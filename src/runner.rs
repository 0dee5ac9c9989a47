use crate::command::Extractor;
use crate::label::{Classifier, DeadlineLabel};
use crate::tracker::{Issue, IssueTracker};
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use log::{debug, info};

pub const DEFAULT_LABEL_COLOR: &str = "ff0000";

/// What a single pass over the open issues did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Issues that received a new label, with the label applied.
    pub labeled: Vec<(u64, DeadlineLabel)>,
    /// Issues that already carried the right label.
    pub unchanged: usize,
    /// Issues without a deadline command.
    pub skipped: usize,
}

/// Keeps deadline labels on open issues in line with their `/deadline` commands.
pub struct Runner<T: IssueTracker> {
    tracker: T,
    classifier: Classifier,
    label_color: String,
    allow_short_dates: bool,
}

impl<T: IssueTracker> Runner<T> {
    pub fn new(tracker: T, classifier: Classifier) -> Self {
        Self {
            tracker,
            classifier,
            label_color: DEFAULT_LABEL_COLOR.to_string(),
            allow_short_dates: false,
        }
    }

    pub fn with_label_color(mut self, color: impl Into<String>) -> Self {
        self.label_color = color.into();
        self
    }

    /// Accept `MM/dd` dates, completed with the current year in the
    /// classifier's time zone.
    pub fn with_short_dates(mut self, allow: bool) -> Self {
        self.allow_short_dates = allow;
        self
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn into_tracker(self) -> T {
        self.tracker
    }

    /// Label every open issue according to the last deadline command in its
    /// body and comments.
    pub fn update_labels(&mut self, now: DateTime<Utc>) -> Result<UpdateSummary> {
        let extractor = if self.allow_short_dates {
            Extractor::with_default_year(self.classifier.time_zone.local_date(now).year())
        } else {
            Extractor::new()
        };

        let mut summary = UpdateSummary::default();
        for issue in self.tracker.open_issues()? {
            let Some(deadline) = extractor.extract(&issue.text()) else {
                debug!("Issue #{} has no deadline command", issue.number);
                summary.skipped += 1;
                continue;
            };

            let label = self.classifier.classify(deadline, now);
            if self.update_label_in_issue(&issue, &label)? {
                info!("Labeled issue #{} with '{}'", issue.number, label);
                summary.labeled.push((issue.number, label));
            } else {
                summary.unchanged += 1;
            }
        }
        Ok(summary)
    }

    /// Returns `false` when the issue already carries `label`.
    fn update_label_in_issue(&mut self, issue: &Issue, label: &DeadlineLabel) -> Result<bool> {
        let name = label.name();
        if issue.has_label(&name) {
            return Ok(false);
        }

        let stale = issue.labels.iter().filter(|existing| DeadlineLabel::is_deadline_label(existing));
        for existing in stale {
            self.tracker.remove_label(issue.number, existing).with_context(|| {
                format!("Failed to remove '{}' from issue #{}", existing, issue.number)
            })?;
        }

        self.create_label(&name)?;
        self.tracker
            .add_label(issue.number, &name)
            .with_context(|| format!("Failed to add '{}' to issue #{}", name, issue.number))?;
        Ok(true)
    }

    fn create_label(&mut self, name: &str) -> Result<()> {
        if self.tracker.label_exists(name)? {
            return Ok(());
        }
        debug!("Creating label '{}'", name);
        self.tracker
            .create_label(name, &self.label_color)
            .with_context(|| format!("Failed to create label '{}'", name))
    }
}
