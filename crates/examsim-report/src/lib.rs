//! examsim-report: Result presentation.
//!
//! Renders a finished [`SessionReport`](examsim_core::report::SessionReport)
//! as a self-contained HTML page.

pub mod html;

pub use html::{generate_html, write_html_report};
