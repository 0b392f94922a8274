use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Record has no usable `HCC_version`; the whole bundle is skipped.
    MissingHccVersion,
    /// `(version, column)` not present in the crosswalk.
    CrosswalkMiss,
    UnparseableInteger,
    UnparseableDecimal,
    UnparseableDate,
    /// Field present with an empty value.
    EmptyValue,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingHccVersion => "missing_hcc_version",
            DiagnosticKind::CrosswalkMiss => "crosswalk_miss",
            DiagnosticKind::UnparseableInteger => "unparseable_integer",
            DiagnosticKind::UnparseableDecimal => "unparseable_decimal",
            DiagnosticKind::UnparseableDate => "unparseable_date",
            DiagnosticKind::EmptyValue => "empty_value",
        }
    }

    /// True when the diagnostic means no bundle was produced for the record.
    pub fn aborts_record(&self) -> bool {
        matches!(self, DiagnosticKind::MissingHccVersion)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable problem found while synthesizing one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub mbi: String,
    pub kind: DiagnosticKind,
    /// Field the diagnostic refers to, if any.
    pub key: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        mbi: impl Into<String>,
        kind: DiagnosticKind,
        key: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            mbi: mbi.into(),
            kind,
            key: key.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "[{}] {}: {}", self.kind, key, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}
