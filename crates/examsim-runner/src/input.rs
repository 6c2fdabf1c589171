//! Line-oriented command input.
//!
//! Reading is blocking and meant to run on its own thread, so a pending read
//! never holds up the runtime once the session is over.

use std::io::BufRead;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::command::{Command, ParseCommandError};

/// Read commands line by line from `reader` and send them to the runner.
///
/// Blank lines are skipped and unparsable lines are passed to `on_invalid`.
/// Returns when the input ends, after an `Abandon` command, or once the
/// runner has hung up. Dropping `tx` on return closes the channel.
///
/// Must not be called from within an async context.
pub fn forward_commands<R, F>(reader: R, tx: mpsc::Sender<Command>, mut on_invalid: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(&ParseCommandError),
{
    for line in reader.lines() {
        let line = line.context("failed to read command input")?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseCommandError::Empty) => continue,
            Err(e) => {
                on_invalid(&e);
                continue;
            }
        };

        if tx.blocking_send(command).is_err() {
            tracing::debug!("runner stopped, no longer reading input");
            break;
        }
        if command == Command::Abandon {
            break;
        }
    }
    Ok(())
}

/// Forward commands typed on stdin from a background thread.
pub fn spawn_stdin_reader<F>(tx: mpsc::Sender<Command>, on_invalid: F) -> JoinHandle<Result<()>>
where
    F: FnMut(&ParseCommandError) + Send + 'static,
{
    std::thread::spawn(move || forward_commands(std::io::stdin().lock(), tx, on_invalid))
}
