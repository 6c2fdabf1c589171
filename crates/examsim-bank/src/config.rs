//! Bank configuration, exam presets, and the bank factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use examsim_core::model::SessionConfig;
use examsim_core::traits::QuestionBank;

use crate::http::HttpBank;
use crate::local::LocalBank;

/// Where questions come from.
///
/// The `Debug` impl masks the API key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BankConfig {
    Local {
        #[serde(default = "default_question_path")]
        path: PathBuf,
    },
    Http {
        base_url: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

impl std::fmt::Debug for BankConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BankConfig::Local { path } => f.debug_struct("Local").field("path", path).finish(),
            BankConfig::Http {
                base_url,
                api_key,
                timeout_secs,
            } => f
                .debug_struct("Http")
                .field("base_url", base_url)
                .field("api_key", &api_key.as_ref().map(|_| "***"))
                .field("timeout_secs", timeout_secs)
                .finish(),
        }
    }
}

impl Default for BankConfig {
    fn default() -> Self {
        BankConfig::Local {
            path: default_question_path(),
        }
    }
}

fn default_question_path() -> PathBuf {
    PathBuf::from("question-sets")
}

/// Top-level examsim configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamsimConfig {
    /// Question bank to draw from.
    #[serde(default)]
    pub bank: BankConfig,
    /// Exam presets keyed by name.
    #[serde(default = "default_exams")]
    pub exams: HashMap<String, SessionConfig>,
    /// Preset used when none is given on the command line.
    #[serde(default = "default_exam")]
    pub default_exam: String,
    /// Output directory for session reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_exams() -> HashMap<String, SessionConfig> {
    HashMap::from([
        ("quick".to_string(), SessionConfig::new(10, 15)),
        ("full".to_string(), SessionConfig::new(80, 300)),
    ])
}
fn default_exam() -> String {
    "quick".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./examsim-results")
}

impl Default for ExamsimConfig {
    fn default() -> Self {
        Self {
            bank: BankConfig::default(),
            exams: default_exams(),
            default_exam: default_exam(),
            output_dir: default_output_dir(),
        }
    }
}

impl ExamsimConfig {
    /// Look up an exam preset, falling back to `default_exam`.
    pub fn exam(&self, name: Option<&str>) -> Result<(&str, &SessionConfig)> {
        let name = name.unwrap_or(&self.default_exam);
        let (key, exam) = self.exams.get_key_value(name).with_context(|| {
            let mut known: Vec<&str> = self.exams.keys().map(String::as_str).collect();
            known.sort_unstable();
            format!("unknown exam '{name}' (configured: {})", known.join(", "))
        })?;
        Ok((key.as_str(), exam))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are taken literally, never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_bank_config(config: &BankConfig) -> BankConfig {
    match config {
        BankConfig::Local { path } => BankConfig::Local {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
        BankConfig::Http {
            base_url,
            api_key,
            timeout_secs,
        } => BankConfig::Http {
            base_url: resolve_env_vars(base_url),
            api_key: api_key.as_deref().map(resolve_env_vars),
            timeout_secs: *timeout_secs,
        },
    }
}

/// Point the bank at `url` and/or authenticate with `key`.
///
/// A URL switches any bank to HTTP. A key alone only applies to an HTTP bank.
fn apply_overrides(config: &mut ExamsimConfig, url: Option<String>, key: Option<String>) {
    if let Some(url) = url {
        let (api_key, timeout_secs) = match &config.bank {
            BankConfig::Http {
                api_key,
                timeout_secs,
                ..
            } => (api_key.clone(), *timeout_secs),
            BankConfig::Local { .. } => (None, None),
        };
        config.bank = BankConfig::Http {
            base_url: url,
            api_key,
            timeout_secs,
        };
    }

    if let Some(key) = key {
        match &mut config.bank {
            BankConfig::Http { api_key, .. } => *api_key = Some(key),
            BankConfig::Local { .. } => {
                tracing::debug!("EXAMSIM_API_KEY set but bank is local, ignoring");
            }
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examsim.toml` in the current directory
/// 2. `~/.config/examsim/config.toml`
///
/// Environment variable overrides: `EXAMSIM_API_URL`, `EXAMSIM_API_KEY`.
pub fn load_config() -> Result<ExamsimConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamsimConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("examsim.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ExamsimConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamsimConfig::default(),
    };

    apply_overrides(
        &mut config,
        std::env::var("EXAMSIM_API_URL").ok(),
        std::env::var("EXAMSIM_API_KEY").ok(),
    );
    config.bank = resolve_bank_config(&config.bank);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examsim"))
}

/// Create a question bank from its configuration.
pub fn create_bank(config: &BankConfig) -> Result<Box<dyn QuestionBank>> {
    match config {
        BankConfig::Local { path } => {
            let bank = LocalBank::from_path(path)
                .with_context(|| format!("failed to load question bank from {}", path.display()))?;
            tracing::info!(
                questions = bank.question_count(),
                path = %path.display(),
                "local question bank ready"
            );
            Ok(Box::new(bank))
        }
        BankConfig::Http {
            base_url,
            api_key,
            timeout_secs,
        } => Ok(Box::new(HttpBank::new(
            base_url,
            api_key.clone(),
            *timeout_secs,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMSIM_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_EXAMSIM_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_EXAMSIM_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_EXAMSIM_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_reexpand_values() {
        std::env::set_var("_EXAMSIM_TEST_SELF", "${_EXAMSIM_TEST_SELF}");
        std::env::set_var("_EXAMSIM_TEST_OTHER", "x");
        assert_eq!(
            resolve_env_vars("${_EXAMSIM_TEST_SELF}-${_EXAMSIM_TEST_OTHER}"),
            "${_EXAMSIM_TEST_SELF}-x"
        );
        std::env::remove_var("_EXAMSIM_TEST_SELF");
        std::env::remove_var("_EXAMSIM_TEST_OTHER");
    }

    #[test]
    fn default_config() {
        let config = ExamsimConfig::default();
        assert_eq!(config.default_exam, "quick");
        assert_eq!(config.exams["quick"], SessionConfig::new(10, 15));
        assert_eq!(config.exams["full"].time_limit_minutes, 300);
        assert!(matches!(config.bank, BankConfig::Local { .. }));
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
default_exam = "oab"
output_dir = "results"

[bank]
type = "http"
base_url = "https://questions.example.com/api"
api_key = "secret"
timeout_secs = 5

[exams.oab]
total_questions = 3
time_limit_minutes = 20

[[exams.oab.subjects]]
subject = "civil"
count = 2

[[exams.oab.subjects]]
subject = "penal"
count = 1
"#;
        let config: ExamsimConfig = toml::from_str(toml_str).unwrap();
        let (name, exam) = config.exam(None).unwrap();
        assert_eq!(name, "oab");
        assert_eq!(exam.allocated_questions(), 3);
        assert_eq!(exam.subjects[0].subject, "civil");
        assert!(matches!(
            config.bank,
            BankConfig::Http {
                timeout_secs: Some(5),
                ..
            }
        ));
        // Presets replace the built-in ones entirely.
        assert!(config.exam(Some("quick")).is_err());
    }

    #[test]
    fn unknown_exam_lists_known_ones() {
        let err = ExamsimConfig::default().exam(Some("bar")).unwrap_err();
        assert!(err.to_string().contains("full, quick"));
    }

    #[test]
    fn debug_masks_api_key() {
        let bank = BankConfig::Http {
            base_url: "http://localhost".into(),
            api_key: Some("sk-very-secret".into()),
            timeout_secs: None,
        };
        let debug = format!("{bank:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn url_override_switches_to_http() {
        let mut config = ExamsimConfig::default();
        apply_overrides(&mut config, Some("http://bank".into()), Some("k".into()));
        match config.bank {
            BankConfig::Http {
                base_url, api_key, ..
            } => {
                assert_eq!(base_url, "http://bank");
                assert_eq!(api_key.as_deref(), Some("k"));
            }
            other => panic!("expected http bank, got {other:?}"),
        }
    }

    #[test]
    fn key_override_ignored_for_local_bank() {
        let mut config = ExamsimConfig::default();
        apply_overrides(&mut config, None, Some("k".into()));
        assert!(matches!(config.bank, BankConfig::Local { .. }));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examsim.toml");
        std::fs::write(
            &path,
            "[bank]\ntype = \"local\"\npath = \"sets\"\n\n[exams.tiny]\ntotal_questions = 1\ntime_limit_minutes = 1\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert!(config.exams.contains_key("tiny"));
        assert_eq!(config.output_dir, PathBuf::from("./examsim-results"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/examsim.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn create_local_bank_from_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("set.toml"),
            r#"
[set]
id = "s"
name = "S"

[[questions]]
id = "q1"
subject = "civil"
prompt = "?"

[[questions.options]]
id = "a"
text = "yes"
correct = true
"#,
        )
        .unwrap();

        let bank = create_bank(&BankConfig::Local {
            path: dir.path().to_path_buf(),
        })
        .unwrap();
        assert_eq!(bank.name(), "local");
    }
}
