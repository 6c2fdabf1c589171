//! The `examsim list-exams` command.

use std::path::PathBuf;

use anyhow::Result;

use examsim_bank::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    println!("Bank: {:?}", config.bank);

    if config.exams.is_empty() {
        println!("No exams configured. Run `examsim init` to create a config file.");
        return Ok(());
    }

    let mut names: Vec<&String> = config.exams.keys().collect();
    names.sort();

    println!("Exams:");
    for name in names {
        let exam = &config.exams[name];
        let default = if *name == config.default_exam { " (default)" } else { "" };
        println!(
            "  {name}{default}: {} questions, {} min",
            exam.total_questions, exam.time_limit_minutes
        );
        for allocation in &exam.subjects {
            println!("    {} x{}", allocation.subject, allocation.count);
        }
    }

    Ok(())
}
