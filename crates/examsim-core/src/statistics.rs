//! Aggregate statistics over a history of session reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::report::SessionReport;
use crate::scoring::SubjectScore;

/// Statistics across every session in a history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Number of sessions aggregated.
    pub sessions: usize,
    /// Mean of per-session accuracy.
    pub mean_accuracy: f64,
    /// Best per-session accuracy.
    pub best_accuracy: f64,
    /// Mean time spent per session, in seconds.
    pub mean_time_spent_secs: u64,
    /// Sessions that ended because the clock ran out.
    pub expired_sessions: usize,
    /// Per-subject totals accumulated over all sessions.
    pub per_subject: BTreeMap<String, SubjectStats>,
}

/// Accumulated results for one subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectStats {
    pub subject: String,
    /// Number of sessions that contained the subject.
    pub sessions: usize,
    /// Summed correct/total counts.
    pub score: SubjectScore,
}

impl SubjectStats {
    pub fn accuracy(&self) -> f64 {
        self.score.accuracy()
    }
}

/// Compute history statistics. An empty history yields all zeros.
pub fn compute_history_stats(reports: &[SessionReport]) -> HistoryStats {
    if reports.is_empty() {
        return HistoryStats::default();
    }

    let n = reports.len();
    let accuracies: Vec<f64> = reports.iter().map(|r| r.result.accuracy()).collect();
    let mean_accuracy = accuracies.iter().sum::<f64>() / n as f64;
    let best_accuracy = accuracies.iter().copied().fold(0.0, f64::max);
    let mean_time_spent_secs =
        reports.iter().map(|r| r.result.time_spent_secs).sum::<u64>() / n as u64;
    let expired_sessions = reports
        .iter()
        .filter(|r| r.result.finish_reason == crate::scoring::FinishReason::TimeExpired)
        .count();

    let mut per_subject: BTreeMap<String, SubjectStats> = BTreeMap::new();
    for report in reports {
        for (subject, score) in &report.result.per_subject {
            let entry = per_subject
                .entry(subject.clone())
                .or_insert_with(|| SubjectStats {
                    subject: subject.clone(),
                    ..Default::default()
                });
            entry.sessions += 1;
            entry.score.correct += score.correct;
            entry.score.total += score.total;
        }
    }

    HistoryStats {
        sessions: n,
        mean_accuracy,
        best_accuracy,
        mean_time_spent_secs,
        expired_sessions,
        per_subject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{FinishReason, SessionResult};
    use chrono::Utc;
    use uuid::Uuid;

    fn report(scores: &[(&str, u32, u32)], secs: u64, reason: FinishReason) -> SessionReport {
        let per_subject: BTreeMap<String, SubjectScore> = scores
            .iter()
            .map(|&(s, correct, total)| (s.to_string(), SubjectScore { correct, total }))
            .collect();
        SessionReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            started_at: Utc::now(),
            exam: "quick".into(),
            bank: "test".into(),
            time_limit_minutes: 10,
            result: SessionResult {
                total_questions: per_subject.values().map(|s| s.total).sum(),
                correct: per_subject.values().map(|s| s.correct).sum(),
                time_spent_secs: secs,
                per_subject,
                finish_reason: reason,
            },
            review: vec![],
        }
    }

    #[test]
    fn empty_history() {
        let stats = compute_history_stats(&[]);
        assert_eq!(stats.sessions, 0);
        assert_eq!(stats.mean_accuracy, 0.0);
        assert!(stats.per_subject.is_empty());
    }

    #[test]
    fn aggregates_sessions_and_subjects() {
        let reports = vec![
            report(&[("civil", 2, 4), ("penal", 1, 1)], 100, FinishReason::Submitted),
            report(&[("civil", 4, 4)], 300, FinishReason::TimeExpired),
        ];
        let stats = compute_history_stats(&reports);

        assert_eq!(stats.sessions, 2);
        assert!((stats.mean_accuracy - (0.6 + 1.0) / 2.0).abs() < 1e-9);
        assert_eq!(stats.best_accuracy, 1.0);
        assert_eq!(stats.mean_time_spent_secs, 200);
        assert_eq!(stats.expired_sessions, 1);

        let civil = &stats.per_subject["civil"];
        assert_eq!(civil.sessions, 2);
        assert_eq!(civil.score, SubjectScore { correct: 6, total: 8 });
        assert_eq!(civil.accuracy(), 0.75);
        assert_eq!(stats.per_subject["penal"].sessions, 1);
    }

    #[test]
    fn empty_session_in_history_counts_as_zero() {
        let reports = vec![
            report(&[], 0, FinishReason::EmptySession),
            report(&[("civil", 1, 1)], 10, FinishReason::Submitted),
        ];
        let stats = compute_history_stats(&reports);
        assert_eq!(stats.mean_accuracy, 0.5);
    }
}
