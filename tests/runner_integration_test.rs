use anyhow::Result;
use chrono::{TimeZone, Utc};
use deadline_labeler::config::Config;
use deadline_labeler::runner::Runner;
use deadline_labeler::tracker::{IssueTracker, MemoryTracker};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

const ISSUES: &str = r#"{
  "labels": [
    {"name": "bug", "color": "d73a4a"},
    {"name": "deadline: 3 weeks", "color": "ff0000"}
  ],
  "issues": [
    {"number": 1, "title": "Report", "body": "Homework\n/deadline 2021/12/01 09:00", "labels": ["bug"]},
    {"number": 2, "title": "Slides", "body": "/deadline 2021/11/20",
     "comments": ["moved: /deadline 2021/11/05 18:00"], "labels": ["deadline: 3 weeks"]},
    {"number": 3, "title": "Idea", "body": null},
    {"number": 4, "title": "Done", "body": "/deadline 2021/10/01", "state": "closed"}
  ]
}"#;

#[test]
fn test_apply_labels_to_issue_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("issues.json");
    fs::write(&path, ISSUES)?;

    let mut config = Config::default();
    config.deadline.time_zone = "Asia/Tokyo".parse()?;
    config.labels.color = "0e8a16".to_string();

    let tracker = MemoryTracker::load(&path)?;
    assert_eq!(tracker.open_issues()?.len(), 3);

    let mut runner =
        Runner::new(tracker, config.classifier()).with_label_color(&config.labels.color);
    let now = Utc.with_ymd_and_hms(2021, 11, 1, 0, 0, 0).unwrap();
    let summary = runner.update_labels(now)?;
    assert_eq!(summary.labeled.len(), 2);
    assert_eq!(summary.unchanged, 0);
    assert_eq!(summary.skipped, 1);

    runner.into_tracker().save(&path)?;
    let saved = MemoryTracker::load(&path)?;

    // 2021-12-01 09:00 JST is 4 calendar weeks after Monday 2021-11-01.
    assert_eq!(
        saved.issue(1).unwrap().labels,
        vec!["bug".to_string(), "deadline: 4 weeks".to_string()]
    );
    assert_eq!(saved.issue(2).unwrap().labels, vec!["deadline: 4 days".to_string()]);
    assert!(saved.issue(3).unwrap().labels.is_empty());
    assert!(saved.issue(4).unwrap().labels.is_empty());

    let created: Vec<(&str, &str)> = saved
        .labels
        .iter()
        .map(|label| (label.name.as_str(), label.color.as_str()))
        .collect();
    assert_eq!(
        created,
        vec![
            ("bug", "d73a4a"),
            ("deadline: 3 weeks", "ff0000"),
            ("deadline: 4 weeks", "0e8a16"),
            ("deadline: 4 days", "0e8a16"),
        ]
    );
    Ok(())
}
