//! The `examsim compare` command.

use std::path::PathBuf;

use anyhow::Result;

use examsim_core::report::SessionReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&threshold),
        "threshold must be between 0.0 and 1.0"
    );

    let baseline = SessionReport::load_json(&baseline_path)?;
    let current = SessionReport::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Overall: {:.1}% -> {:.1}%",
                report.baseline_accuracy * 100.0,
                report.current_accuracy * 100.0
            );
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );

            if !report.regressions.is_empty() {
                println!("\nRegressions:");
                for r in &report.regressions {
                    println!(
                        "  {} {:.1}% -> {:.1}% ({:+.1}%)",
                        r.subject,
                        r.baseline_accuracy * 100.0,
                        r.current_accuracy * 100.0,
                        r.delta * 100.0
                    );
                }
            }

            if !report.improvements.is_empty() {
                println!("\nImprovements:");
                for i in &report.improvements {
                    println!(
                        "  {} {:.1}% -> {:.1}% ({:+.1}%)",
                        i.subject,
                        i.baseline_accuracy * 100.0,
                        i.current_accuracy * 100.0,
                        i.delta * 100.0
                    );
                }
            }

            if report.new_subjects > 0 {
                println!("\n{} new subject(s)", report.new_subjects);
            }
            if report.removed_subjects > 0 {
                println!("{} removed subject(s)", report.removed_subjects);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
