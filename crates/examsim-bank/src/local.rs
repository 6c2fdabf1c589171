//! Question bank backed by local TOML question sets.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use examsim_core::model::{Question, SessionConfig};
use examsim_core::parser;
use examsim_core::traits::QuestionBank;

/// Serves questions loaded from question-set files, in file order.
pub struct LocalBank {
    questions: Vec<Question>,
}

impl LocalBank {
    /// Create a bank over an in-memory question list.
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Load one question-set file, or every set under a directory.
    ///
    /// Questions whose id was already seen in an earlier set are dropped.
    pub fn from_path(path: &Path) -> Result<Self> {
        let sets = parser::load_question_sets(path)?;

        let mut seen = HashSet::new();
        let mut questions = Vec::new();
        for set in sets {
            tracing::debug!(set = %set.id, questions = set.questions.len(), "loaded question set");
            for question in set.questions {
                if seen.insert(question.id.clone()) {
                    questions.push(question);
                } else {
                    tracing::warn!(
                        question = %question.id,
                        set = %set.id,
                        "duplicate question id, keeping the first one"
                    );
                }
            }
        }

        Ok(Self::new(questions))
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Number of questions available per subject.
    pub fn subjects(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for q in &self.questions {
            *counts.entry(q.subject.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Pick questions for `config`.
    ///
    /// With a subject allocation, takes the first `count` questions of each
    /// subject in allocation order; otherwise the first `total_questions`.
    /// Never returns more than `total_questions`.
    pub fn select(&self, config: &SessionConfig) -> Vec<Question> {
        let limit = config.total_questions as usize;

        let mut selected: Vec<Question> = if config.subjects.is_empty() {
            self.questions.iter().take(limit).cloned().collect()
        } else {
            let mut picked = Vec::new();
            for allocation in &config.subjects {
                let before = picked.len();
                picked.extend(
                    self.questions
                        .iter()
                        .filter(|q| q.subject == allocation.subject)
                        .take(allocation.count as usize)
                        .cloned(),
                );
                let got = picked.len() - before;
                if got < allocation.count as usize {
                    tracing::debug!(
                        subject = %allocation.subject,
                        requested = allocation.count,
                        available = got,
                        "subject exhausted"
                    );
                }
            }
            picked
        };

        selected.truncate(limit);
        selected
    }
}

#[async_trait]
impl QuestionBank for LocalBank {
    fn name(&self) -> &str {
        "local"
    }

    async fn fetch_questions(&self, config: &SessionConfig) -> anyhow::Result<Vec<Question>> {
        Ok(self.select(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examsim_core::model::{AnswerOption, Difficulty};

    fn q(id: &str, subject: &str) -> Question {
        Question {
            id: id.into(),
            subject: subject.into(),
            difficulty: Difficulty::Easy,
            prompt: format!("{id}?"),
            options: vec![AnswerOption {
                id: "a".into(),
                text: "A".into(),
                is_correct: true,
            }],
            explanation: String::new(),
            source: None,
        }
    }

    fn bank() -> LocalBank {
        LocalBank::new(vec![
            q("c1", "civil"),
            q("p1", "penal"),
            q("c2", "civil"),
            q("p2", "penal"),
            q("t1", "tax"),
        ])
    }

    fn ids(questions: &[Question]) -> Vec<&str> {
        questions.iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn select_without_allocation_takes_first_n() {
        let picked = bank().select(&SessionConfig::new(3, 10));
        assert_eq!(ids(&picked), vec!["c1", "p1", "c2"]);
    }

    #[test]
    fn select_follows_allocation_order() {
        let config = SessionConfig::new(3, 10)
            .with_subject("penal", 2)
            .with_subject("civil", 1);
        let picked = bank().select(&config);
        assert_eq!(ids(&picked), vec!["p1", "p2", "c1"]);
    }

    #[test]
    fn select_tolerates_exhausted_subjects() {
        let config = SessionConfig::new(6, 10)
            .with_subject("tax", 3)
            .with_subject("labor", 3);
        let picked = bank().select(&config);
        assert_eq!(ids(&picked), vec!["t1"]);
    }

    #[test]
    fn select_never_exceeds_total() {
        let config = SessionConfig::new(2, 10)
            .with_subject("civil", 2)
            .with_subject("penal", 2);
        assert_eq!(bank().select(&config).len(), 2);
    }

    #[test]
    fn subject_counts() {
        let counts = bank().subjects();
        assert_eq!(counts["civil"], 2);
        assert_eq!(counts["tax"], 1);
        assert_eq!(bank().question_count(), 5);
    }

    const SET_A: &str = r#"
[set]
id = "a"
name = "A"

[[questions]]
id = "shared"
subject = "civil"
prompt = "From A"

[[questions.options]]
id = "a"
text = "yes"
correct = true
"#;

    const SET_B: &str = r#"
[set]
id = "b"
name = "B"

[[questions]]
id = "shared"
subject = "civil"
prompt = "From B"

[[questions.options]]
id = "a"
text = "yes"
correct = true

[[questions]]
id = "only-b"
subject = "penal"
prompt = "Only in B"

[[questions.options]]
id = "a"
text = "yes"
correct = true
"#;

    #[tokio::test]
    async fn loads_directory_and_drops_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), SET_A).unwrap();
        std::fs::write(dir.path().join("b.toml"), SET_B).unwrap();

        let bank = LocalBank::from_path(dir.path()).unwrap();
        assert_eq!(bank.question_count(), 2);

        let questions = bank
            .fetch_questions(&SessionConfig::new(5, 1))
            .await
            .unwrap();
        assert_eq!(questions[0].prompt, "From A");
        assert_eq!(questions[1].id, "only-b");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(LocalBank::from_path(Path::new("/nonexistent/questions.toml")).is_err());
    }
}
