//! examsim-runner: Real-time session driver.
//!
//! Drives an [`ExamSession`] from two event sources: a ticker that feeds the
//! session clock and a channel of user [`Command`]s. Both are consumed by a
//! single loop, which is the only place the session is mutated.

pub mod command;
pub mod input;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use examsim_core::clock::ClockEvent;
use examsim_core::session::ExamSession;
use examsim_core::traits::SessionObserver;

pub use command::{Command, ParseCommandError};

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The session reached `Finished`, by submission or by the clock.
    Finished(Box<ExamSession>),
    /// The user quit, or the command channel closed, before the session
    /// finished. No result was produced.
    Abandoned,
}

/// Runs sessions against a real (or tokio-paused) clock.
pub struct SessionRunner {
    tick_period: Duration,
}

impl Default for SessionRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRunner {
    pub fn new() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
        }
    }

    /// Wall time per clock tick. One tick is always one counted second.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period.max(Duration::from_millis(1));
        self
    }

    /// Drive `session` until it finishes or is abandoned.
    ///
    /// Commands take priority over the ticker, so a command that arrives in
    /// the same instant as the expiring tick is applied before expiry.
    pub async fn run(
        &self,
        mut session: ExamSession,
        mut commands: mpsc::Receiver<Command>,
        observer: &dyn SessionObserver,
    ) -> RunOutcome {
        if !session.is_finished() {
            show_current(&session, observer);

            let mut ticker = time::interval_at(Instant::now() + self.tick_period, self.tick_period);
            while !session.is_finished() {
                tokio::select! {
                    biased;

                    received = commands.recv() => {
                        let Some(command) = received.filter(|c| *c != Command::Abandon) else {
                            session.abandon();
                            return RunOutcome::Abandoned;
                        };
                        apply(&mut session, command, observer);
                    }
                    _ = ticker.tick() => {
                        match session.on_clock_tick() {
                            ClockEvent::Ticked { remaining } => observer.on_tick(remaining),
                            ClockEvent::Expired => observer.on_tick(0),
                            ClockEvent::Ignored => {}
                        }
                    }
                }
            }
        }

        if let Some(result) = session.result() {
            observer.on_finished(result);
        }
        RunOutcome::Finished(Box::new(session))
    }
}

fn apply(session: &mut ExamSession, command: Command, observer: &dyn SessionObserver) {
    tracing::debug!(?command, "applying command");
    let changed = match command {
        Command::SelectOption(position) => session.select_option_at(position),
        Command::Next => session.next_question(),
        Command::Previous => session.previous_question(),
        Command::GoTo(index) => session.go_to_question(index),
        Command::Pause => {
            if session.pause() {
                observer.on_paused(session.time_remaining_secs());
            }
            return;
        }
        Command::Resume => {
            if session.resume() {
                observer.on_resumed(session.time_remaining_secs());
            }
            return;
        }
        Command::Finish => {
            session.finish();
            return;
        }
        // Handled by the run loop, which owns the session.
        Command::Abandon => return,
    };

    if changed {
        show_current(session, observer);
    } else {
        tracing::debug!(?command, "command had no effect");
    }
}

fn show_current(session: &ExamSession, observer: &dyn SessionObserver) {
    if let Some(question) = session.current_question() {
        let index = session.current_index();
        observer.on_question(
            index,
            session.questions().len(),
            question,
            session.answer_for(index),
        );
    }
}
