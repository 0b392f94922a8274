//! Crosswalk file path resolution.

use std::path::{Path, PathBuf};

use crate::crosswalk::CrosswalkTable;
use crate::error::StandardsError;

/// Environment variable naming an explicit crosswalk file.
pub const CROSSWALK_ENV_VAR: &str = "ALR_CROSSWALK_PATH";

/// Deployment locations, in the order they are tried.
pub const DEFAULT_CANDIDATES: [&str; 4] = [
    "./hcc_crosswalk.tsv",
    "/etc/sv/api/hcc_crosswalk.tsv",
    "/etc/sv/worker/hcc_crosswalk.tsv",
    "/etc/sv/nfs/hcc_crosswalk.tsv",
];

/// Ordered list of places to look for the crosswalk.
///
/// The default resolution order is the `ALR_CROSSWALK_PATH` environment
/// variable, then [`DEFAULT_CANDIDATES`]. An explicit path replaces the
/// search entirely: if it is missing, loading fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrosswalkSource {
    candidates: Vec<PathBuf>,
}

impl Default for CrosswalkSource {
    fn default() -> Self {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var(CROSSWALK_ENV_VAR)
            && !path.trim().is_empty()
        {
            candidates.push(PathBuf::from(path));
        }
        candidates.extend(DEFAULT_CANDIDATES.iter().map(PathBuf::from));
        Self { candidates }
    }
}

impl CrosswalkSource {
    /// A source that only tries the given paths, in order.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// A source that loads `path` and nothing else.
    pub fn explicit(path: impl AsRef<Path>) -> Self {
        Self::from_paths([path.as_ref()])
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    pub fn load(&self) -> Result<CrosswalkTable, StandardsError> {
        CrosswalkTable::load(&self.candidates)
    }
}
