//! Session reports with JSON persistence and progress comparison.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::{QuestionReview, SessionResult};
use crate::session::ExamSession;

/// A finished session, ready to be stored or rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier (the session id).
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// Exam preset the session was started from.
    pub exam: String,
    /// Name of the question bank that supplied the questions.
    pub bank: String,
    /// Time limit the session ran with, in minutes.
    pub time_limit_minutes: u32,
    /// The scored outcome.
    pub result: SessionResult,
    /// Per-question review.
    pub review: Vec<QuestionReview>,
}

impl SessionReport {
    /// Build a report from a finished session. Returns `None` while the
    /// session is still running or paused.
    pub fn from_session(session: &ExamSession, exam: &str, bank: &str) -> Option<Self> {
        let result = session.result()?.clone();
        Some(Self {
            id: session.id(),
            created_at: Utc::now(),
            started_at: session.started_at(),
            exam: exam.to_string(),
            bank: bank.to_string(),
            time_limit_minutes: session.config().time_limit_minutes,
            result,
            review: session.review(),
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Load every `*.json` report in a directory, oldest first.
    ///
    /// Files that are not reports are skipped with a warning.
    pub fn load_dir(dir: &Path) -> Result<Vec<Self>> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read directory: {}", dir.display()))?;

        let mut reports = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match Self::load_json(&path) {
                    Ok(report) => reports.push(report),
                    Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
                }
            }
        }
        reports.sort_by_key(|r| r.created_at);
        Ok(reports)
    }

    /// Compare this report against a baseline, subject by subject.
    ///
    /// A subject regresses when its accuracy drops by more than `threshold`.
    pub fn compare(&self, baseline: &SessionReport, threshold: f64) -> ProgressReport {
        let accuracy_map = |report: &SessionReport| -> BTreeMap<String, f64> {
            report
                .result
                .per_subject
                .iter()
                .map(|(subject, score)| (subject.clone(), score.accuracy()))
                .collect()
        };

        let baseline_scores = accuracy_map(baseline);
        let current_scores = accuracy_map(self);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_subjects = 0usize;

        for (subject, &current) in &current_scores {
            if let Some(&baseline_val) = baseline_scores.get(subject) {
                let delta = current - baseline_val;
                let change = SubjectChange {
                    subject: subject.clone(),
                    baseline_accuracy: baseline_val,
                    current_accuracy: current,
                    delta,
                };
                if delta < -threshold {
                    regressions.push(change);
                } else if delta > threshold {
                    improvements.push(change);
                } else {
                    unchanged += 1;
                }
            } else {
                new_subjects += 1;
            }
        }

        let removed_subjects = baseline_scores
            .keys()
            .filter(|k| !current_scores.contains_key(*k))
            .count();

        ProgressReport {
            baseline_accuracy: baseline.result.accuracy(),
            current_accuracy: self.result.accuracy(),
            regressions,
            improvements,
            unchanged,
            new_subjects,
            removed_subjects,
        }
    }
}

/// Result of comparing two session reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Overall accuracy of the baseline session.
    pub baseline_accuracy: f64,
    /// Overall accuracy of the current session.
    pub current_accuracy: f64,
    /// Subjects whose accuracy went down.
    pub regressions: Vec<SubjectChange>,
    /// Subjects whose accuracy went up.
    pub improvements: Vec<SubjectChange>,
    /// Subjects with no significant change.
    pub unchanged: usize,
    /// Subjects in current but not baseline.
    pub new_subjects: usize,
    /// Subjects in baseline but not current.
    pub removed_subjects: usize,
}

/// Accuracy change of one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectChange {
    pub subject: String,
    pub baseline_accuracy: f64,
    pub current_accuracy: f64,
    pub delta: f64,
}

impl ProgressReport {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Overall:** {:.1}% -> {:.1}%\n\n",
            self.baseline_accuracy * 100.0,
            self.current_accuracy * 100.0
        ));
        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        for (title, changes) in [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Subject | Baseline | Current | Delta |\n");
            md.push_str("|---------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {:.1}% | {:.1}% | {:+.1}% |\n",
                    c.subject,
                    c.baseline_accuracy * 100.0,
                    c.current_accuracy * 100.0,
                    c.delta * 100.0
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if any subject regressed.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
