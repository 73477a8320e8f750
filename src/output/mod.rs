//! Output formatting module
//!
//! Provides various output formats for probe results.

mod formatter;

pub use formatter::{banner, OutputFormat, ResultFormatter};
