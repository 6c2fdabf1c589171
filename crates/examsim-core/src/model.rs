//! Core data model types for examsim.
//!
//! Questions, their answer options, question sets, and the immutable
//! configuration a session is started with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier for this question.
    pub id: String,
    /// Subject identifier (e.g. "constitutional-law").
    pub subject: String,
    /// Difficulty level.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// The question text shown to the candidate.
    pub prompt: String,
    /// Answer options in display order.
    pub options: Vec<AnswerOption>,
    /// Explanation shown when reviewing the answer.
    #[serde(default)]
    pub explanation: String,
    /// Where the question was published.
    #[serde(default)]
    pub source: Option<QuestionSource>,
}

impl Question {
    /// Check the option invariants: at least one option, unique option ids,
    /// and exactly one correct option.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.options.is_empty() {
            return Err(ModelError::NoOptions {
                question: self.id.clone(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for option in &self.options {
            if !seen.insert(option.id.as_str()) {
                return Err(ModelError::DuplicateOptionId {
                    question: self.id.clone(),
                    option: option.id.clone(),
                });
            }
        }

        match self.options.iter().filter(|o| o.is_correct).count() {
            1 => Ok(()),
            0 => Err(ModelError::NoCorrectOption {
                question: self.id.clone(),
            }),
            count => Err(ModelError::MultipleCorrectOptions {
                question: self.id.clone(),
                count,
            }),
        }
    }

    /// Look up an option by id.
    pub fn option(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// The correct option, if the question is well formed.
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.is_correct)
    }

    /// Returns `true` if `option_id` names the correct option.
    ///
    /// Unknown ids are simply wrong.
    pub fn is_correct_answer(&self, option_id: &str) -> bool {
        self.option(option_id).is_some_and(|o| o.is_correct)
    }
}

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Identifier, unique within its question (e.g. "a").
    pub id: String,
    /// Display text.
    pub text: String,
    /// Whether this is the correct answer.
    #[serde(default, rename = "correct")]
    pub is_correct: bool,
}

/// Exam board and year a question was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSource {
    pub board: String,
    #[serde(default)]
    pub year: Option<u16>,
}

impl fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} {}", self.board, year),
            None => write!(f, "{}", self.board),
        }
    }
}

/// Ordinal difficulty level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A named collection of questions, as loaded from one question-set file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    /// Unique identifier for this set.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this set.
    #[serde(default)]
    pub description: String,
    /// The questions, in file order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// How many questions of one subject a session should draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectAllocation {
    pub subject: String,
    pub count: u32,
}

/// Immutable parameters of one exam session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of questions requested from the bank.
    pub total_questions: u32,
    /// Time limit in minutes.
    pub time_limit_minutes: u32,
    /// Ordered subject allocation. Empty means "any subject".
    #[serde(default)]
    pub subjects: Vec<SubjectAllocation>,
}

impl SessionConfig {
    pub fn new(total_questions: u32, time_limit_minutes: u32) -> Self {
        Self {
            total_questions,
            time_limit_minutes,
            subjects: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>, count: u32) -> Self {
        self.subjects.push(SubjectAllocation {
            subject: subject.into(),
            count,
        });
        self
    }

    /// Total time budget in seconds.
    pub fn time_limit_secs(&self) -> u64 {
        u64::from(self.time_limit_minutes) * 60
    }

    /// Sum of the per-subject allocation counts.
    pub fn allocated_questions(&self) -> u32 {
        self.subjects.iter().map(|s| s.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &[bool]) -> Question {
        Question {
            id: "q1".into(),
            subject: "civil".into(),
            difficulty: Difficulty::Medium,
            prompt: "Which?".into(),
            options: correct
                .iter()
                .enumerate()
                .map(|(i, &c)| AnswerOption {
                    id: format!("o{i}"),
                    text: format!("Option {i}"),
                    is_correct: c,
                })
                .collect(),
            explanation: String::new(),
            source: None,
        }
    }

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("2".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("brutal".parse::<Difficulty>().is_err());
        assert!(Difficulty::Easy < Difficulty::Hard);
    }

    #[test]
    fn validate_exactly_one_correct() {
        assert!(question(&[true, false, false]).validate().is_ok());
        assert!(matches!(
            question(&[false, false]).validate(),
            Err(ModelError::NoCorrectOption { .. })
        ));
        assert!(matches!(
            question(&[true, true]).validate(),
            Err(ModelError::MultipleCorrectOptions { count: 2, .. })
        ));
        assert!(matches!(
            question(&[]).validate(),
            Err(ModelError::NoOptions { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_option_ids() {
        let mut q = question(&[true, false]);
        q.options[1].id = "o0".into();
        assert!(matches!(
            q.validate(),
            Err(ModelError::DuplicateOptionId { .. })
        ));
    }

    #[test]
    fn unknown_option_is_not_correct() {
        let q = question(&[false, true]);
        assert!(q.is_correct_answer("o1"));
        assert!(!q.is_correct_answer("o0"));
        assert!(!q.is_correct_answer("zzz"));
        assert_eq!(q.correct_option().map(|o| o.id.as_str()), Some("o1"));
    }

    #[test]
    fn session_config_time_and_allocation() {
        let config = SessionConfig::new(10, 15)
            .with_subject("civil", 6)
            .with_subject("penal", 4);
        assert_eq!(config.time_limit_secs(), 900);
        assert_eq!(config.allocated_questions(), 10);
        assert_eq!(config.subjects[0].subject, "civil");
    }

    #[test]
    fn question_serde_roundtrip_uses_correct_key() {
        let q = question(&[true, false]);
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"correct\":true"));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
