//! Mock question bank for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use examsim_core::model::{AnswerOption, Difficulty, Question, SessionConfig};
use examsim_core::traits::QuestionBank;

/// A question bank that serves a fixed list, for exercising sessions without
/// files or network access.
pub struct MockBank {
    questions: Vec<Question>,
    /// Number of fetches made.
    call_count: AtomicU32,
    /// Last config received.
    last_config: Mutex<Option<SessionConfig>>,
}

impl MockBank {
    /// Serve `questions`, truncated to the requested total.
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            call_count: AtomicU32::new(0),
            last_config: Mutex::new(None),
        }
    }

    /// `n` generated questions over the given subjects, round robin. Each has
    /// options `a` (correct) and `b`.
    pub fn generated(n: usize, subjects: &[&str]) -> Self {
        let questions = (0..n)
            .map(|i| Question {
                id: format!("mock-{i}"),
                subject: subjects
                    .get(i % subjects.len().max(1))
                    .copied()
                    .unwrap_or("general")
                    .to_string(),
                difficulty: Difficulty::Medium,
                prompt: format!("Mock question {}", i + 1),
                options: vec![
                    AnswerOption {
                        id: "a".into(),
                        text: "Correct answer".into(),
                        is_correct: true,
                    },
                    AnswerOption {
                        id: "b".into(),
                        text: "Wrong answer".into(),
                        is_correct: false,
                    },
                ],
                explanation: format!("Explanation for mock question {}", i + 1),
                source: None,
            })
            .collect();
        Self::new(questions)
    }

    /// Get the number of fetches made against this bank.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last config passed to `fetch_questions`.
    pub fn last_config(&self) -> Option<SessionConfig> {
        self.last_config
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuestionBank for MockBank {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_questions(&self, config: &SessionConfig) -> anyhow::Result<Vec<Question>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_config.lock() {
            *last = Some(config.clone());
        }

        Ok(self
            .questions
            .iter()
            .take(config.total_questions as usize)
            .cloned()
            .collect())
    }
}
