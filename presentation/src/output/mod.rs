//! Verdict output: console rendering and the JSON results document

pub mod console;
pub mod formatter;
pub mod results;
