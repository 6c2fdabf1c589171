//! User commands and their text form.

use std::str::FromStr;

use thiserror::Error;

/// One user action against a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Select the option at this 0-based position of the current question.
    SelectOption(usize),
    Next,
    Previous,
    /// Jump to this 0-based question index.
    GoTo(usize),
    Pause,
    Resume,
    /// Submit the session for scoring.
    Finish,
    /// Leave without a result.
    Abandon,
}

/// Short usage text for the command grammar.
pub const HELP: &str = "\
commands:
  a-z | 1-9     select an option of the current question
  n | next      next question
  p | prev      previous question
  g N | goto N  jump to question N
  pause         pause the clock
  resume        resume the clock
  finish        submit and score
  quit          abandon without a result";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("invalid question number: {0}")]
    InvalidQuestionNumber(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let mut parts = input.split_whitespace();
        let Some(word) = parts.next() else {
            return Err(ParseCommandError::Empty);
        };

        match word {
            "n" | "next" => Ok(Command::Next),
            "p" | "prev" | "previous" => Ok(Command::Previous),
            "pause" => Ok(Command::Pause),
            "resume" => Ok(Command::Resume),
            "finish" | "submit" => Ok(Command::Finish),
            "quit" | "abandon" => Ok(Command::Abandon),
            "g" | "goto" => {
                let arg = parts.next().unwrap_or_default();
                match arg.parse::<usize>() {
                    Ok(n) if n >= 1 => Ok(Command::GoTo(n - 1)),
                    _ => Err(ParseCommandError::InvalidQuestionNumber(arg.to_string())),
                }
            }
            _ => parse_option(word).ok_or_else(|| ParseCommandError::Unknown(s.trim().to_string())),
        }
    }
}

/// `a`..`z` or `1`..`9` as a 0-based option position.
fn parse_option(word: &str) -> Option<Command> {
    let mut chars = word.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match c {
        'a'..='z' => Some(Command::SelectOption(c as usize - 'a' as usize)),
        '1'..='9' => Some(Command::SelectOption(c as usize - '1' as usize)),
        _ => None,
    }
}
