//! examsim-core: Session clock, exam state machine, and scoring.
//!
//! This crate defines the data model, the timed session state machine, and
//! the scoring logic that the rest of examsim builds on.

pub mod clock;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod statistics;
pub mod traits;
