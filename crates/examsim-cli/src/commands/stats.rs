//! The `examsim stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examsim_core::report::SessionReport;
use examsim_core::statistics::compute_history_stats;

pub fn execute(history: PathBuf, format: String) -> Result<()> {
    let reports = SessionReport::load_dir(&history)?;
    if reports.is_empty() {
        println!("No session reports found in {}", history.display());
        return Ok(());
    }

    let stats = compute_history_stats(&reports);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "{} session(s), mean accuracy {:.1}%, best {:.1}%, {} ran out of time",
        stats.sessions,
        stats.mean_accuracy * 100.0,
        stats.best_accuracy * 100.0,
        stats.expired_sessions
    );
    println!(
        "Mean time spent: {}m {:02}s",
        stats.mean_time_spent_secs / 60,
        stats.mean_time_spent_secs % 60
    );

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Sessions", "Correct", "Total", "Accuracy"]);
    for subject in stats.per_subject.values() {
        table.add_row(vec![
            Cell::new(&subject.subject),
            Cell::new(subject.sessions),
            Cell::new(subject.score.correct),
            Cell::new(subject.score.total),
            Cell::new(format!("{:.1}%", subject.accuracy() * 100.0)),
        ]);
    }
    println!("\n{table}");

    Ok(())
}
