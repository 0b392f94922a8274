//! Batch orchestration: classify, synthesize and encode every record, then
//! the batch-level Group.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use alr_model::{
    AlrRecord, Diagnostic, DiagnosticKind, GroupMember, Resource, ResourceKind, SchemaVersion,
};
use alr_standards::CrosswalkTable;
use alr_transform::{GroupScope, ResourceBundle, SchemaProfile, synth, synthesize_record};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::encoder::{JsonEncoder, ResourceEncoder};
use crate::error::Result;

/// Identity of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchContext {
    /// Used as the id of the v2 batch Group.
    pub batch_id: String,
    /// `meta.lastUpdated` of the v2 batch Group.
    pub timestamp: DateTime<Utc>,
}

impl BatchContext {
    pub fn new(batch_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            batch_id: batch_id.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Synthesize records on the rayon pool.
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutput {
    /// Serialized blobs in output order. A RiskAssessment blob holds every
    /// assessment of one record joined by `\n`.
    pub texts: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: BatchSummary,
}

impl BatchOutput {
    /// Individual resource lines, splitting joined RiskAssessment blobs.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().flat_map(|text| text.lines())
    }

    pub fn counts_by_kind(&self) -> &BTreeMap<DiagnosticKind, usize> {
        &self.summary.diagnostics
    }
}

/// Counts for reporting a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub records: usize,
    pub bundles: usize,
    pub aborted: usize,
    pub resources: BTreeMap<ResourceKind, usize>,
    pub diagnostics: BTreeMap<DiagnosticKind, usize>,
}

/// Encoded output of one record.
struct RecordOutput {
    blobs: Vec<String>,
    kinds: Vec<ResourceKind>,
    member: Option<GroupMember>,
    diagnostics: Vec<Diagnostic>,
    produced_bundle: bool,
}

/// Runs whole batches under one schema version.
///
/// The crosswalk is loaded once by the caller and shared by every record.
pub struct BatchOrchestrator<E = JsonEncoder> {
    crosswalk: Arc<CrosswalkTable>,
    profile: &'static SchemaProfile,
    encoder: E,
    options: BatchOptions,
}

impl BatchOrchestrator<JsonEncoder> {
    pub fn new(crosswalk: Arc<CrosswalkTable>, version: SchemaVersion) -> Self {
        Self {
            crosswalk,
            profile: SchemaProfile::for_version(version),
            encoder: JsonEncoder,
            options: BatchOptions::default(),
        }
    }
}

impl<E: ResourceEncoder> BatchOrchestrator<E> {
    pub fn with_encoder<F: ResourceEncoder>(self, encoder: F) -> BatchOrchestrator<F> {
        BatchOrchestrator {
            crosswalk: self.crosswalk,
            profile: self.profile,
            encoder,
            options: self.options,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn profile(&self) -> &'static SchemaProfile {
        self.profile
    }

    pub fn version(&self) -> SchemaVersion {
        self.profile.version
    }

    /// Synthesize and encode a batch.
    ///
    /// Output order follows input order regardless of parallelism. Records
    /// that abort contribute diagnostics only. The first encoding failure
    /// fails the whole batch.
    pub fn run(&self, records: &[AlrRecord], batch: &BatchContext) -> Result<BatchOutput> {
        let span = info_span!(
            "batch",
            batch_id = %batch.batch_id,
            version = %self.profile.version,
            records = records.len()
        );
        let _enter = span.enter();
        let start = Instant::now();

        let outputs: Vec<RecordOutput> = if self.options.parallel {
            records
                .par_iter()
                .map(|record| self.process_record(record))
                .collect::<Result<_>>()?
        } else {
            records
                .iter()
                .map(|record| self.process_record(record))
                .collect::<Result<_>>()?
        };

        let mut output = BatchOutput::default();
        output.summary.records = records.len();
        let mut members = Vec::new();
        for record in outputs {
            if record.produced_bundle {
                output.summary.bundles += 1;
            } else {
                output.summary.aborted += 1;
            }
            for kind in record.kinds {
                *output.summary.resources.entry(kind).or_default() += 1;
            }
            for diagnostic in &record.diagnostics {
                *output.summary.diagnostics.entry(diagnostic.kind).or_default() += 1;
            }
            output.texts.extend(record.blobs);
            output.diagnostics.extend(record.diagnostics);
            members.extend(record.member);
        }

        if self.profile.group_scope == GroupScope::Batch {
            if members.is_empty() {
                debug!("no group members in batch, skipping batch group");
            } else {
                let group =
                    synth::batch_group(self.profile, &batch.batch_id, &batch.timestamp, members);
                output
                    .texts
                    .push(self.encoder.encode(&Resource::Group(group))?);
                *output.summary.resources.entry(ResourceKind::Group).or_default() += 1;
            }
        }

        info!(
            bundles = output.summary.bundles,
            aborted = output.summary.aborted,
            diagnostics = output.diagnostics.len(),
            duration_ms = start.elapsed().as_millis(),
            "batch synthesized"
        );
        Ok(output)
    }

    fn process_record(&self, record: &AlrRecord) -> Result<RecordOutput> {
        let synthesis = synthesize_record(record, &self.crosswalk, self.profile);
        let mut output = RecordOutput {
            blobs: Vec::new(),
            kinds: Vec::new(),
            member: synthesis.member,
            diagnostics: synthesis.diagnostics,
            produced_bundle: synthesis.bundle.is_some(),
        };
        if let Some(bundle) = synthesis.bundle {
            self.encode_bundle(bundle, &mut output)?;
        }
        Ok(output)
    }

    /// One blob per resource in bundle order, except that all of a record's
    /// RiskAssessments share one newline-joined blob.
    fn encode_bundle(&self, bundle: ResourceBundle, output: &mut RecordOutput) -> Result<()> {
        let mut risk = Vec::new();
        for resource in bundle.into_resources() {
            let text = self.encoder.encode(&resource)?;
            output.kinds.push(resource.kind());
            if resource.kind() == ResourceKind::RiskAssessment {
                risk.push(text);
                continue;
            }
            if !risk.is_empty() {
                output.blobs.push(risk.join("\n"));
                risk.clear();
            }
            output.blobs.push(text);
        }
        if !risk.is_empty() {
            output.blobs.push(risk.join("\n"));
        }
        Ok(())
    }
}
