//! The `examsim take` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use examsim_bank::config::load_config_from;
use examsim_bank::{create_bank, BankConfig};
use examsim_core::model::Question;
use examsim_core::report::SessionReport;
use examsim_core::scoring::SessionResult;
use examsim_core::session::start_from_bank;
use examsim_core::traits::SessionObserver;
use examsim_report::html::write_html_report;
use examsim_runner::command::HELP;
use examsim_runner::input::spawn_stdin_reader;
use examsim_runner::{RunOutcome, SessionRunner};

/// Console session view. Questions go to stdout, timer notices to stderr.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_question(&self, index: usize, total: usize, question: &Question, selected: Option<&str>) {
        let source = question
            .source
            .as_ref()
            .map(|s| format!(" ({s})"))
            .unwrap_or_default();
        println!(
            "\nQuestion {}/{} [{}, {}]{}",
            index + 1,
            total,
            question.subject,
            question.difficulty,
            source
        );
        println!("{}", question.prompt);
        for (i, option) in question.options.iter().enumerate() {
            let marker = if selected == Some(option.id.as_str()) {
                '*'
            } else {
                ' '
            };
            println!("{marker} {}) {}", option_label(i), option.text);
        }
    }

    fn on_tick(&self, remaining_secs: u64) {
        if remaining_secs > 0 && (remaining_secs % 300 == 0 || matches!(remaining_secs, 60 | 30 | 10)) {
            eprintln!("  [{} left]", clock(remaining_secs));
        }
    }

    fn on_paused(&self, remaining_secs: u64) {
        eprintln!("  Paused with {} left. Type `resume` to continue.", clock(remaining_secs));
    }

    fn on_resumed(&self, remaining_secs: u64) {
        eprintln!("  Resumed, {} left.", clock(remaining_secs));
    }

    fn on_finished(&self, result: &SessionResult) {
        eprintln!(
            "\nFinished ({}): {}/{} correct",
            result.finish_reason, result.correct, result.total_questions
        );
    }
}

fn option_label(position: usize) -> char {
    u8::try_from(position)
        .ok()
        .filter(|p| *p < 26)
        .map(|p| char::from(b'a' + p))
        .unwrap_or('?')
}

fn clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub async fn execute(
    exam: Option<String>,
    bank_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
    tick_ms: u64,
) -> Result<()> {
    anyhow::ensure!(tick_ms >= 1, "tick-ms must be at least 1");

    let config = load_config_from(config_path.as_deref())?;
    let (exam_name, session_config) = config.exam(exam.as_deref())?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let bank_config = match bank_path {
        Some(path) => BankConfig::Local { path },
        None => config.bank.clone(),
    };
    let bank = create_bank(&bank_config)?;

    let session = start_from_bank(bank.as_ref(), session_config.clone()).await?;

    eprintln!(
        "examsim v{}: {} ({} questions, {} min)",
        env!("CARGO_PKG_VERSION"),
        exam_name,
        session.questions().len(),
        session_config.time_limit_minutes
    );
    eprintln!("{HELP}");

    let (tx, rx) = mpsc::channel(32);
    // The reader thread is left behind if the clock ends the session first.
    let _reader = spawn_stdin_reader(tx, |e| eprintln!("  {e}"));

    let runner = SessionRunner::new().with_tick_period(Duration::from_millis(tick_ms));
    let session = match runner.run(session, rx, &ConsoleObserver).await {
        RunOutcome::Finished(session) => session,
        RunOutcome::Abandoned => {
            eprintln!("Session abandoned, no result recorded.");
            return Ok(());
        }
    };

    let report = SessionReport::from_session(&session, exam_name, bank.name())
        .context("session ended without a result")?;
    print_summary(&report);

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    let id = report.id.to_string();
    let stem = format!("session-{timestamp}-{}", &id[..8]);

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("{stem}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("{stem}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &SessionReport) {
    use comfy_table::{Cell, Table};

    let result = &report.result;
    let mut table = Table::new();
    table.set_header(vec!["Subject", "Correct", "Total", "Accuracy"]);

    for (subject, score) in &result.per_subject {
        table.add_row(vec![
            Cell::new(subject),
            Cell::new(score.correct),
            Cell::new(score.total),
            Cell::new(format!("{:.1}%", score.accuracy() * 100.0)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Overall"),
        Cell::new(result.correct),
        Cell::new(result.total_questions),
        Cell::new(format!("{:.1}%", result.accuracy() * 100.0)),
    ]);

    eprintln!("\n{table}");
    eprintln!(
        "Time spent: {} of {}:00",
        clock(result.time_spent_secs),
        report.time_limit_minutes
    );
}
