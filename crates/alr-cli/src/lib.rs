//! CLI library components for the ALR synthesizer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod records;
pub mod summary;
pub mod types;
