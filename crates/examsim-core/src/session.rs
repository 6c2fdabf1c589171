//! The exam session state machine.
//!
//! A session is `Running`, `Paused` or `Finished`. Navigation, answering and
//! pause/resume are synchronous; the clock tick is the only recurring input.
//! Once `Finished`, every mutating call is ignored.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{ClockEvent, ClockStatus, SessionClock};
use crate::error::SessionError;
use crate::model::{Question, SessionConfig};
use crate::scoring::{self, FinishReason, QuestionReview, SessionResult};
use crate::traits::QuestionBank;

/// Selected option id per question index. Last write wins.
pub type AnswerRecord = BTreeMap<usize, String>;

/// Lifecycle state of an [`ExamSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Paused,
    Finished,
}

/// A live exam session.
#[derive(Debug, Clone)]
pub struct ExamSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    config: SessionConfig,
    questions: Vec<Question>,
    current_index: usize,
    answers: AnswerRecord,
    clock: SessionClock,
    status: SessionStatus,
    result: Option<SessionResult>,
}

impl ExamSession {
    /// Start a session over `questions`.
    ///
    /// The question list is authoritative, even when shorter than
    /// `config.total_questions`. A session with no questions or no time is
    /// finished on creation.
    pub fn start(config: SessionConfig, questions: Vec<Question>) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            config,
            questions,
            current_index: 0,
            answers: AnswerRecord::new(),
            clock: SessionClock::new(),
            status: SessionStatus::Running,
            result: None,
        };

        tracing::info!(
            session = %session.id,
            questions = session.questions.len(),
            time_limit_secs = session.config.time_limit_secs(),
            "session started"
        );

        let armed = session.clock.start(session.config.time_limit_secs());
        if session.questions.is_empty() {
            session.finish_with(FinishReason::EmptySession);
        } else if armed == ClockEvent::Expired {
            session.finish_with(FinishReason::TimeExpired);
        }
        session
    }

    /// Record `option_id` as the answer to the current question.
    ///
    /// Allowed while running or paused.
    pub fn select_answer(&mut self, option_id: impl Into<String>) -> bool {
        if self.is_finished() {
            return false;
        }
        let option_id = option_id.into();
        tracing::debug!(index = self.current_index, option = %option_id, "answer selected");
        self.answers.insert(self.current_index, option_id);
        true
    }

    /// Select the option at `position` (0-based) of the current question.
    pub fn select_option_at(&mut self, position: usize) -> bool {
        let Some(option_id) = self
            .current_question()
            .and_then(|q| q.options.get(position))
            .map(|o| o.id.clone())
        else {
            return false;
        };
        self.select_answer(option_id)
    }

    /// Jump to question `index`. Out-of-range targets and the current index
    /// are ignored.
    pub fn go_to_question(&mut self, index: usize) -> bool {
        if self.is_finished() || index >= self.questions.len() || index == self.current_index {
            return false;
        }
        tracing::debug!(from = self.current_index, to = index, "navigated");
        self.current_index = index;
        true
    }

    pub fn next_question(&mut self) -> bool {
        self.go_to_question(self.current_index + 1)
    }

    pub fn previous_question(&mut self) -> bool {
        match self.current_index.checked_sub(1) {
            Some(index) => self.go_to_question(index),
            None => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }
        self.clock.pause();
        self.status = SessionStatus::Paused;
        tracing::debug!(remaining = self.clock.remaining(), "session paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        self.clock.resume();
        self.status = SessionStatus::Running;
        tracing::debug!(remaining = self.clock.remaining(), "session resumed");
        true
    }

    /// Feed one elapsed second. Reaching zero finishes the session.
    pub fn on_clock_tick(&mut self) -> ClockEvent {
        if self.status != SessionStatus::Running {
            return ClockEvent::Ignored;
        }
        let event = self.clock.tick();
        if event == ClockEvent::Expired {
            self.finish_with(FinishReason::TimeExpired);
        }
        event
    }

    /// Submit the session. Idempotent: later calls return the same result.
    pub fn finish(&mut self) -> SessionResult {
        self.finish_with(FinishReason::Submitted)
    }

    fn finish_with(&mut self, reason: FinishReason) -> SessionResult {
        if let Some(result) = &self.result {
            return result.clone();
        }

        self.clock.stop();
        self.status = SessionStatus::Finished;
        let result = scoring::score(
            &self.config,
            &self.questions,
            &self.answers,
            self.clock.remaining(),
            reason,
        );

        tracing::info!(
            session = %self.id,
            reason = %reason,
            correct = result.correct,
            total = result.total_questions,
            time_spent_secs = result.time_spent_secs,
            "session finished"
        );

        self.result = Some(result.clone());
        result
    }

    /// Leave the session without scoring it. Stops the clock.
    pub fn abandon(mut self) {
        if !self.is_finished() {
            self.clock.stop();
            tracing::info!(
                session = %self.id,
                answered = self.answers.len(),
                "session abandoned"
            );
        }
    }

    /// Per-question review rows. Available at any time, meaningful once
    /// finished.
    pub fn review(&self) -> Vec<QuestionReview> {
        scoring::review(&self.questions, &self.answers)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn time_remaining_secs(&self) -> u64 {
        self.clock.remaining()
    }

    pub fn clock_status(&self) -> ClockStatus {
        self.clock.status()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }

    /// The result, once finished.
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }
}

/// Fetch questions from `bank` and start a session.
///
/// Fails only when the bank errors, or returns nothing although at least one
/// question was requested. Extra questions beyond `total_questions` are
/// dropped.
pub async fn start_from_bank(
    bank: &dyn QuestionBank,
    config: SessionConfig,
) -> Result<ExamSession, SessionError> {
    let mut questions = bank
        .fetch_questions(&config)
        .await
        .map_err(|error| SessionError::Bank {
            bank: bank.name().to_string(),
            error,
        })?;

    if questions.is_empty() && config.total_questions > 0 {
        return Err(SessionError::NoQuestions {
            bank: bank.name().to_string(),
            requested: config.total_questions,
        });
    }

    let requested = config.total_questions as usize;
    if questions.len() > requested {
        tracing::warn!(
            bank = bank.name(),
            returned = questions.len(),
            requested,
            "bank returned too many questions, truncating"
        );
        questions.truncate(requested);
    } else if questions.len() < requested {
        tracing::debug!(
            bank = bank.name(),
            returned = questions.len(),
            requested,
            "bank exhausted, starting a shorter session"
        );
    }

    Ok(ExamSession::start(config, questions))
}
