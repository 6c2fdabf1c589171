//! examsim-bank: Question bank backends.
//!
//! Implements the `QuestionBank` trait for local TOML question sets and a
//! remote REST API, plus the configuration file that selects between them.

pub mod config;
pub mod error;
pub mod http;
pub mod local;
pub mod mock;

pub use config::{create_bank, load_config, BankConfig, ExamsimConfig};
pub use error::BankError;
pub use http::HttpBank;
pub use local::LocalBank;
pub use mock::MockBank;
