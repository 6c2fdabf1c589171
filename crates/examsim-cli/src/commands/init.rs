//! The `examsim init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    if Path::new("examsim.toml").exists() {
        println!("examsim.toml already exists, skipping.");
    } else {
        std::fs::write("examsim.toml", SAMPLE_CONFIG).context("failed to write examsim.toml")?;
        println!("Created examsim.toml");
    }

    std::fs::create_dir_all("question-sets")?;
    let sample_path = Path::new("question-sets/sample.toml");
    if sample_path.exists() {
        println!("question-sets/sample.toml already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_QUESTION_SET)
            .context("failed to write question-sets/sample.toml")?;
        println!("Created question-sets/sample.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your own question sets under question-sets/");
    println!("  2. Run: examsim validate --questions question-sets");
    println!("  3. Run: examsim take --exam sample");

    Ok(())
}

pub(crate) const SAMPLE_CONFIG: &str = r#"# examsim configuration

default_exam = "sample"
output_dir = "./examsim-results"

[bank]
type = "local"
path = "question-sets"

# Remote bank instead:
# [bank]
# type = "http"
# base_url = "${EXAMSIM_API_URL}"
# api_key = "${EXAMSIM_API_KEY}"
# timeout_secs = 30

[exams.sample]
total_questions = 4
time_limit_minutes = 5

[[exams.sample.subjects]]
subject = "constitutional"
count = 2

[[exams.sample.subjects]]
subject = "civil"
count = 2

[exams.quick]
total_questions = 10
time_limit_minutes = 15

[exams.full]
total_questions = 80
time_limit_minutes = 300
"#;

pub(crate) const SAMPLE_QUESTION_SET: &str = r#"[set]
id = "sample"
name = "Sample Questions"
description = "A few questions to try examsim with"

[[questions]]
id = "const-001"
subject = "constitutional"
difficulty = "easy"
prompt = "Which branch of government is primarily responsible for making laws?"
explanation = "Legislative power belongs to the legislature."

[questions.source]
board = "Sample Board"
year = 2024

[[questions.options]]
id = "a"
text = "The legislature"
correct = true

[[questions.options]]
id = "b"
text = "The judiciary"

[[questions.options]]
id = "c"
text = "The executive"

[[questions]]
id = "const-002"
subject = "constitutional"
difficulty = "medium"
prompt = "A constitutional amendment usually requires:"
explanation = "Amendments need a qualified majority, higher than for ordinary laws."

[[questions.options]]
id = "a"
text = "A simple majority in one house"

[[questions.options]]
id = "b"
text = "A qualified majority"
correct = true

[[questions.options]]
id = "c"
text = "A decree of the head of state"

[[questions]]
id = "civil-001"
subject = "civil"
difficulty = "easy"
prompt = "A contract signed by a party lacking legal capacity is generally:"
explanation = "Contracts by incapable parties are voidable or void depending on the degree of incapacity."

[[questions.options]]
id = "a"
text = "Always valid"

[[questions.options]]
id = "b"
text = "Voidable or void"
correct = true

[[questions]]
id = "civil-002"
subject = "civil"
difficulty = "hard"
prompt = "Which element is not required for civil liability?"
explanation = "Liability needs conduct, damage and a causal link; intent is not always required."

[[questions.options]]
id = "a"
text = "Damage"

[[questions.options]]
id = "b"
text = "Causal link"

[[questions.options]]
id = "c"
text = "Intent to cause harm"
correct = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use examsim_bank::ExamsimConfig;
    use examsim_core::parser;

    #[test]
    fn sample_config_parses() {
        let config: ExamsimConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        let (name, exam) = config.exam(None).unwrap();
        assert_eq!(name, "sample");
        assert_eq!(exam.allocated_questions(), 4);
        assert!(config.exams.contains_key("full"));
    }

    #[test]
    fn sample_question_set_is_clean() {
        let set =
            parser::parse_question_set_str(SAMPLE_QUESTION_SET, Path::new("sample.toml")).unwrap();
        assert_eq!(set.questions.len(), 4);
        assert!(parser::validate_question_set(&set).is_empty());
    }
}
