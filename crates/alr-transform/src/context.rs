use alr_model::{AlrRecord, BucketSet, Decimal, Diagnostic, DiagnosticKind, Meta, ResourceKind};
use alr_standards::CrosswalkTable;
use tracing::warn;

use crate::datetime::instant;
use crate::profile::SchemaProfile;

/// Everything a synthesizer needs for one record.
///
/// Field-level problems are collected here rather than returned, so one bad
/// field never stops the rest of the record.
pub struct SynthesisContext<'a> {
    pub record: &'a AlrRecord,
    pub buckets: &'a BucketSet,
    pub crosswalk: &'a CrosswalkTable,
    pub profile: &'a SchemaProfile,
    /// HCC crosswalk version taken from the record's `HCC_version` field.
    pub hcc_version: &'a str,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> SynthesisContext<'a> {
    pub fn new(
        record: &'a AlrRecord,
        buckets: &'a BucketSet,
        crosswalk: &'a CrosswalkTable,
        profile: &'a SchemaProfile,
        hcc_version: &'a str,
    ) -> Self {
        Self {
            record,
            buckets,
            crosswalk,
            profile,
            hcc_version,
            diagnostics: Vec::new(),
        }
    }

    pub fn mbi(&self) -> &str {
        &self.record.mbi
    }

    /// Profile metadata, stamped with the record timestamp when the schema
    /// version stamps this kind of resource.
    pub fn meta(&self, kind: ResourceKind, profile_uri: &str) -> Meta {
        let stamp = self
            .profile
            .stamps(kind)
            .then(|| instant(&self.record.timestamp));
        Meta::profile(profile_uri).with_last_updated(stamp)
    }

    /// Record a field that was left out of a resource.
    ///
    /// Only the key and kind are logged; the message may quote field values.
    pub fn skip_field(&mut self, kind: DiagnosticKind, key: &str, message: impl Into<String>) {
        warn!(kind = %kind, key, "field skipped");
        self.diagnostics.push(Diagnostic::new(
            self.record.mbi.clone(),
            kind,
            Some(key),
            message,
        ));
    }

    /// Record a classified field whose value is empty.
    pub fn skip_empty(&mut self, key: &str) {
        self.skip_field(DiagnosticKind::EmptyValue, key, "empty value");
    }

    /// Parse an integer field, recording a diagnostic on failure.
    pub fn parse_int(&mut self, key: &str, value: &str) -> Option<i32> {
        match value.trim().parse::<i32>() {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                self.skip_field(
                    DiagnosticKind::UnparseableInteger,
                    key,
                    format!("could not parse {value:?} as an integer: {error}"),
                );
                None
            }
        }
    }

    /// Validate a decimal field, keeping its source text. Records a
    /// diagnostic on failure.
    pub fn parse_decimal(&mut self, key: &str, value: &str) -> Option<Decimal> {
        match Decimal::parse(value) {
            Ok(decimal) => Some(decimal),
            Err(error) => {
                self.skip_field(DiagnosticKind::UnparseableDecimal, key, error.to_string());
                None
            }
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
