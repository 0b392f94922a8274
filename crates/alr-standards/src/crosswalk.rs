//! HCC crosswalk table.
//!
//! Maps `(HCC version, column position)` to the HCC flag code and its
//! description. The table is read once from a tab-separated file with the
//! header `HCC Version`, `HCC Column Position`, `HCC Flag`, `HCC Description`
//! and is read-only afterwards.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::StandardsError;

pub const COL_VERSION: &str = "HCC Version";
pub const COL_POSITION: &str = "HCC Column Position";
pub const COL_FLAG: &str = "HCC Flag";
pub const COL_DESCRIPTION: &str = "HCC Description";

/// Flag code and description for one crosswalk row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HccEntry {
    pub flag: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrosswalkTable {
    /// version -> column -> entry
    entries: BTreeMap<String, BTreeMap<String, HccEntry>>,
    source: Option<PathBuf>,
}

impl CrosswalkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the first candidate that exists and yields at least one row.
    ///
    /// Missing, empty or unparseable candidates are skipped with a warning. Fails
    /// only when no candidate produces a non-empty table.
    pub fn load(candidates: &[PathBuf]) -> Result<Self, StandardsError> {
        for path in candidates {
            if !path.is_file() {
                warn!(path = %path.display(), "crosswalk candidate not present, skipping");
                continue;
            }
            match Self::from_path(path) {
                Ok(table) if !table.is_empty() => {
                    info!(
                        path = %path.display(),
                        entries = table.len(),
                        versions = table.versions().count(),
                        "loaded HCC crosswalk"
                    );
                    return Ok(table);
                }
                Ok(_) => {
                    warn!(path = %path.display(), "crosswalk candidate has no rows, skipping");
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "crosswalk candidate unreadable, skipping");
                }
            }
        }
        Err(StandardsError::CrosswalkNotFound {
            tried: candidates.to_vec(),
        })
    }

    /// Parse a single crosswalk file. An empty table is not an error here.
    pub fn from_path(path: &Path) -> Result<Self, StandardsError> {
        let file = File::open(path).map_err(|e| StandardsError::io(path, e))?;
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .quoting(false)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| StandardsError::csv(path, e))?
            .clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| StandardsError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name,
                })
        };
        let version_idx = column(COL_VERSION)?;
        let position_idx = column(COL_POSITION)?;
        let flag_idx = column(COL_FLAG)?;
        let description_idx = column(COL_DESCRIPTION)?;

        let mut table = CrosswalkTable {
            entries: BTreeMap::new(),
            source: Some(path.to_path_buf()),
        };
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| StandardsError::csv(path, e))?;
            let get = |idx: usize| record.get(idx).unwrap_or("").trim();
            let version = get(version_idx);
            let position = get(position_idx);
            if version.is_empty() || position.is_empty() {
                // +2: header row and 1-based lines
                warn!(path = %path.display(), line = line + 2, "crosswalk row without version or column, skipping");
                continue;
            }
            table.insert(
                version,
                position,
                HccEntry {
                    flag: get(flag_idx).to_string(),
                    description: get(description_idx).to_string(),
                },
            );
        }
        Ok(table)
    }

    pub fn insert(&mut self, version: &str, column: &str, entry: HccEntry) {
        self.entries
            .entry(version.to_string())
            .or_default()
            .insert(column.to_string(), entry);
    }

    /// Look up the HCC flag for a risk-flag column under a crosswalk version.
    pub fn lookup(&self, version: &str, column: &str) -> Option<&HccEntry> {
        self.entries.get(version)?.get(column)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries per version, in version order.
    pub fn version_counts(&self) -> Vec<(&str, usize)> {
        self.entries
            .iter()
            .map(|(version, columns)| (version.as_str(), columns.len()))
            .collect()
    }

    /// File the table was read from, if it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_misses_return_none() {
        let mut table = CrosswalkTable::new();
        table.insert(
            "V24",
            "HCC_COL_19",
            HccEntry {
                flag: "HCC19".to_string(),
                description: "Diabetes".to_string(),
            },
        );
        assert_eq!(table.lookup("V24", "HCC_COL_19").unwrap().flag, "HCC19");
        assert!(table.lookup("V24", "HCC_COL_20").is_none());
        assert!(table.lookup("V22", "HCC_COL_19").is_none());
        assert!(table.lookup("", "").is_none());
        assert_eq!(table.len(), 1);
        assert_eq!(table.versions().collect::<Vec<_>>(), vec!["V24"]);
    }
}
