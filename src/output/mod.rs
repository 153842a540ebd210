//! Output formatting module
//!
//! Provides the text layout of progress, failure details and tallies.

mod formatter;

pub use formatter::{unfinished_message, ReportFormatter};
