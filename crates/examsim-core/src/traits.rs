//! Collaborator traits.
//!
//! The core consumes questions through [`QuestionBank`] and reports session
//! progress through [`SessionObserver`]. Implementations live in
//! `examsim-bank`, `examsim-runner` and the CLI.

use async_trait::async_trait;

use crate::model::{Question, SessionConfig};
use crate::scoring::SessionResult;

// ---------------------------------------------------------------------------
// Question bank
// ---------------------------------------------------------------------------

/// A source of questions for a session.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Human-readable bank name (e.g. "local", "http").
    fn name(&self) -> &str;

    /// Fetch questions for a session.
    ///
    /// Should return `config.total_questions` questions, or fewer if the bank
    /// runs out. The caller treats the returned length as authoritative.
    async fn fetch_questions(&self, config: &SessionConfig) -> anyhow::Result<Vec<Question>>;
}

// ---------------------------------------------------------------------------
// Session observer
// ---------------------------------------------------------------------------

/// Receives progress notifications from a running session.
pub trait SessionObserver: Send + Sync {
    /// The current question changed, or was shown for the first time.
    fn on_question(&self, index: usize, total: usize, question: &Question, selected: Option<&str>);
    /// A tick was counted.
    fn on_tick(&self, remaining_secs: u64);
    fn on_paused(&self, remaining_secs: u64);
    fn on_resumed(&self, remaining_secs: u64);
    /// The session finished. Called once per session.
    fn on_finished(&self, result: &SessionResult);
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_question(&self, _: usize, _: usize, _: &Question, _: Option<&str>) {}
    fn on_tick(&self, _: u64) {}
    fn on_paused(&self, _: u64) {}
    fn on_resumed(&self, _: u64) {}
    fn on_finished(&self, _: &SessionResult) {}
}
