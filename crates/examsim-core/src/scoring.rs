//! Session scoring.
//!
//! Turns the final answers of a session into a [`SessionResult`]. Unanswered
//! questions and answers naming an unknown option both count as incorrect;
//! scoring never fails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Question, SessionConfig};
use crate::session::AnswerRecord;

/// Why a session reached the finished state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The candidate submitted.
    Submitted,
    /// The clock ran out.
    TimeExpired,
    /// There were no questions to answer.
    EmptySession,
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinishReason::Submitted => write!(f, "submitted"),
            FinishReason::TimeExpired => write!(f, "time expired"),
            FinishReason::EmptySession => write!(f, "empty session"),
        }
    }
}

/// Correct/total counts for one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub correct: u32,
    pub total: u32,
}

impl SubjectScore {
    /// Fraction of correct answers in `[0, 1]`; `0.0` for an empty bucket.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.total)
    }
}

/// Final outcome of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Number of questions the session actually held.
    pub total_questions: u32,
    /// Number answered correctly.
    pub correct: u32,
    /// Seconds consumed from the time budget.
    pub time_spent_secs: u64,
    /// Per-subject breakdown keyed by subject id.
    pub per_subject: BTreeMap<String, SubjectScore>,
    /// How the session ended.
    pub finish_reason: FinishReason,
}

impl SessionResult {
    /// Overall accuracy in `[0, 1]`, recomputed from the stored counts.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.total_questions)
    }

    /// Questions answered incorrectly or left blank.
    pub fn incorrect(&self) -> u32 {
        self.total_questions.saturating_sub(self.correct)
    }
}

fn ratio(correct: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(correct) / f64::from(total)
    }
}

/// Score a finished session.
///
/// `time_remaining_secs` is the clock value at the moment the session
/// finished.
pub fn score(
    config: &SessionConfig,
    questions: &[Question],
    answers: &AnswerRecord,
    time_remaining_secs: u64,
    finish_reason: FinishReason,
) -> SessionResult {
    let mut correct = 0u32;
    let mut per_subject: BTreeMap<String, SubjectScore> = BTreeMap::new();

    for (index, question) in questions.iter().enumerate() {
        let bucket = per_subject.entry(question.subject.clone()).or_default();
        bucket.total += 1;

        let is_correct = answers
            .get(&index)
            .is_some_and(|option_id| question.is_correct_answer(option_id));
        if is_correct {
            bucket.correct += 1;
            correct += 1;
        }
    }

    SessionResult {
        total_questions: questions.len() as u32,
        correct,
        time_spent_secs: config.time_limit_secs().saturating_sub(time_remaining_secs),
        per_subject,
        finish_reason,
    }
}

/// Per-question breakdown used when reviewing a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub index: usize,
    pub question_id: String,
    pub subject: String,
    pub prompt: String,
    /// Option the candidate picked, if any.
    pub selected: Option<String>,
    /// Id of the correct option.
    pub correct_option: String,
    pub is_correct: bool,
    pub explanation: String,
}

/// Build the review rows for every question, answered or not.
pub fn review(questions: &[Question], answers: &AnswerRecord) -> Vec<QuestionReview> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let selected = answers.get(&index).cloned();
            let is_correct = selected
                .as_deref()
                .is_some_and(|id| question.is_correct_answer(id));
            QuestionReview {
                index,
                question_id: question.id.clone(),
                subject: question.subject.clone(),
                prompt: question.prompt.clone(),
                selected,
                correct_option: question
                    .correct_option()
                    .map(|o| o.id.clone())
                    .unwrap_or_default(),
                is_correct,
                explanation: question.explanation.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, Difficulty};

    fn question(id: &str, subject: &str) -> Question {
        Question {
            id: id.into(),
            subject: subject.into(),
            difficulty: Difficulty::Easy,
            prompt: format!("Prompt {id}"),
            options: vec![
                AnswerOption {
                    id: "a".into(),
                    text: "right".into(),
                    is_correct: true,
                },
                AnswerOption {
                    id: "b".into(),
                    text: "wrong".into(),
                    is_correct: false,
                },
            ],
            explanation: format!("Because {id}"),
            source: None,
        }
    }

    #[test]
    fn unanswered_counts_toward_subject_total() {
        let questions = vec![
            question("q1", "civil"),
            question("q2", "civil"),
            question("q3", "penal"),
        ];
        let mut answers = AnswerRecord::new();
        answers.insert(0, "a".into());
        answers.insert(2, "b".into());

        let result = score(
            &SessionConfig::new(3, 1),
            &questions,
            &answers,
            45,
            FinishReason::Submitted,
        );

        assert_eq!(result.correct, 1);
        assert_eq!(result.total_questions, 3);
        assert_eq!(result.time_spent_secs, 15);
        assert_eq!(
            result.per_subject["civil"],
            SubjectScore {
                correct: 1,
                total: 2
            }
        );
        assert_eq!(
            result.per_subject["penal"],
            SubjectScore {
                correct: 0,
                total: 1
            }
        );
    }

    #[test]
    fn unknown_option_is_wrong_not_an_error() {
        let questions = vec![question("q1", "civil")];
        let mut answers = AnswerRecord::new();
        answers.insert(0, "nope".into());
        answers.insert(7, "a".into());

        let result = score(
            &SessionConfig::new(1, 1),
            &questions,
            &answers,
            0,
            FinishReason::TimeExpired,
        );
        assert_eq!(result.correct, 0);
        assert_eq!(result.time_spent_secs, 60);
    }

    #[test]
    fn empty_session_accuracy_is_zero() {
        let result = score(
            &SessionConfig::new(0, 0),
            &[],
            &AnswerRecord::new(),
            0,
            FinishReason::EmptySession,
        );
        assert_eq!(result.total_questions, 0);
        assert_eq!(result.accuracy(), 0.0);
        assert!(result.per_subject.is_empty());
    }

    #[test]
    fn accuracy_is_derived_from_counts() {
        let result = SessionResult {
            total_questions: 3,
            correct: 2,
            time_spent_secs: 0,
            per_subject: BTreeMap::new(),
            finish_reason: FinishReason::Submitted,
        };
        assert!((result.accuracy() - 2.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(result.incorrect(), 1);
        assert_eq!(SubjectScore::default().accuracy(), 0.0);
    }

    #[test]
    fn incorrect_never_underflows_on_edited_counts() {
        let result: SessionResult = serde_json::from_str(
            r#"{
                "total_questions": 2,
                "correct": 5,
                "time_spent_secs": 10,
                "per_subject": {},
                "finish_reason": "submitted"
            }"#,
        )
        .unwrap();
        assert_eq!(result.incorrect(), 0);
    }

    #[test]
    fn review_marks_each_question() {
        let questions = vec![question("q1", "civil"), question("q2", "penal")];
        let mut answers = AnswerRecord::new();
        answers.insert(1, "a".into());

        let rows = review(&questions, &answers);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].selected, None);
        assert!(!rows[0].is_correct);
        assert_eq!(rows[0].correct_option, "a");
        assert!(rows[1].is_correct);
        assert_eq!(rows[1].explanation, "Because q2");
    }
}
