//! Issue storage seen by the label runner.
//!
//! [`IssueTracker`] is the narrow interface the runner needs from an issue
//! tracking system. [`MemoryTracker`] keeps everything in memory and can be
//! loaded from and saved to a JSON file.

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Comment bodies, oldest first.
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub state: IssueState,
}

impl Issue {
    /// Body followed by every comment, so that later comments come last.
    pub fn text(&self) -> String {
        self.body
            .iter()
            .chain(self.comments.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label == name)
    }
}

/// Operations the runner performs against an issue tracker.
pub trait IssueTracker {
    fn open_issues(&self) -> Result<Vec<Issue>>;

    fn add_label(&mut self, issue: u64, name: &str) -> Result<()>;

    fn remove_label(&mut self, issue: u64, name: &str) -> Result<()>;

    /// Whether the repository already defines a label called `name`.
    fn label_exists(&self, name: &str) -> Result<bool>;

    fn create_label(&mut self, name: &str, color: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryLabel {
    pub name: String,
    pub color: String,
}

/// Tracker state held in memory; the JSON layout is
/// `{"labels": [{"name", "color"}], "issues": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTracker {
    #[serde(default)]
    pub labels: Vec<RepositoryLabel>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl MemoryTracker {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { labels: Vec::new(), issues }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read issues file {}", path.display()))?;
        let tracker: MemoryTracker = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse issues file {}", path.display()))?;
        info!("Loaded {} issues from {}", tracker.issues.len(), path.display());
        Ok(tracker)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write issues file {}", path.display()))?;
        Ok(())
    }

    pub fn issue(&self, number: u64) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.number == number)
    }

    fn issue_mut(&mut self, number: u64) -> Result<&mut Issue> {
        self.issues
            .iter_mut()
            .find(|issue| issue.number == number)
            .ok_or_else(|| anyhow!("Issue #{} not found", number))
    }
}

impl IssueTracker for MemoryTracker {
    fn open_issues(&self) -> Result<Vec<Issue>> {
        Ok(self.issues.iter().filter(|issue| issue.state == IssueState::Open).cloned().collect())
    }

    fn add_label(&mut self, issue: u64, name: &str) -> Result<()> {
        if !self.label_exists(name)? {
            return Err(anyhow!("Label '{}' does not exist", name));
        }
        let issue = self.issue_mut(issue)?;
        if !issue.has_label(name) {
            debug!("Adding label '{}' to issue #{}", name, issue.number);
            issue.labels.push(name.to_string());
        }
        Ok(())
    }

    fn remove_label(&mut self, issue: u64, name: &str) -> Result<()> {
        let issue = self.issue_mut(issue)?;
        let before = issue.labels.len();
        issue.labels.retain(|label| label != name);
        if issue.labels.len() == before {
            return Err(anyhow!("Issue #{} has no label '{}'", issue.number, name));
        }
        debug!("Removed label '{}' from issue #{}", name, issue.number);
        Ok(())
    }

    fn label_exists(&self, name: &str) -> Result<bool> {
        Ok(self.labels.iter().any(|label| label.name == name))
    }

    fn create_label(&mut self, name: &str, color: &str) -> Result<()> {
        if self.label_exists(name)? {
            return Err(anyhow!("Label '{}' already exists", name));
        }
        self.labels.push(RepositoryLabel { name: name.to_string(), color: color.to_string() });
        Ok(())
    }
}
