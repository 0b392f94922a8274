use std::path::PathBuf;

use alr_core::BatchSummary;
use alr_model::SchemaVersion;

/// Outcome of a `synthesize` run, for the summary table.
#[derive(Debug)]
pub struct SynthesizeResult {
    pub batch_id: String,
    pub version: SchemaVersion,
    pub crosswalk: Option<PathBuf>,
    /// `None` when resources went to stdout.
    pub output: Option<PathBuf>,
    pub lines_written: usize,
    pub summary: BatchSummary,
}

impl SynthesizeResult {
    /// Every record aborted, so nothing useful was produced.
    pub fn is_empty_run(&self) -> bool {
        self.summary.records > 0 && self.summary.bundles == 0
    }
}
