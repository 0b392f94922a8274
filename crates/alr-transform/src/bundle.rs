//! Per-record synthesis.

use alr_map::classify;
use alr_model::{
    AlrRecord, Coverage, Diagnostic, DiagnosticKind, EpisodeOfCare, Group, GroupMember,
    Observation, Patient, Resource, RiskAssessment,
};
use alr_standards::CrosswalkTable;
use tracing::{debug, warn};

use crate::context::SynthesisContext;
use crate::profile::{GroupScope, SchemaProfile};
use crate::synth;

/// Every resource synthesized for one beneficiary.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBundle {
    pub mbi: String,
    pub patient: Patient,
    pub observation: Observation,
    pub coverage: Coverage,
    /// Per-record Group (v1 only).
    pub group: Option<Group>,
    /// Named scores first, monthly aggregate last.
    pub risk: Vec<RiskAssessment>,
    /// COVID-19 episode (v2 only).
    pub episode: Option<EpisodeOfCare>,
}

impl ResourceBundle {
    /// Resources in output order: Patient, Observation, Coverage, Group,
    /// RiskAssessments, EpisodeOfCare.
    pub fn into_resources(self) -> Vec<Resource> {
        let mut out = vec![
            Resource::Patient(self.patient),
            Resource::Observation(self.observation),
            Resource::Coverage(self.coverage),
        ];
        out.extend(self.group.map(Resource::Group));
        out.extend(self.risk.into_iter().map(Resource::RiskAssessment));
        out.extend(self.episode.map(Resource::EpisodeOfCare));
        out
    }
}

/// Result of synthesizing one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSynthesis {
    /// `None` when the record was aborted.
    pub bundle: Option<ResourceBundle>,
    /// Group member to add to the batch Group (v2 only).
    pub member: Option<GroupMember>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RecordSynthesis {
    fn aborted(diagnostic: Diagnostic) -> Self {
        Self {
            bundle: None,
            member: None,
            diagnostics: vec![diagnostic],
        }
    }
}

/// Classify a record and build its resources under the given profile.
///
/// A record without an `HCC_version` yields no bundle and exactly one
/// [`DiagnosticKind::MissingHccVersion`] diagnostic.
pub fn synthesize_record(
    record: &AlrRecord,
    crosswalk: &CrosswalkTable,
    profile: &SchemaProfile,
) -> RecordSynthesis {
    let buckets = classify(record);
    let Some(hcc_version) = buckets.hcc_version() else {
        warn!(version = %profile.version, "record has no HCC version, skipping");
        return RecordSynthesis::aborted(Diagnostic::new(
            record.mbi.clone(),
            DiagnosticKind::MissingHccVersion,
            Some(alr_model::record::HCC_VERSION_KEY),
            "record has no HCC version; no resources were produced",
        ));
    };

    let mut ctx = SynthesisContext::new(record, &buckets, crosswalk, profile, hcc_version);
    let patient = synth::patient(&mut ctx);
    let observation = synth::observation(&mut ctx);
    let coverage = synth::coverage(&mut ctx);
    let member = synth::member(&mut ctx);
    let risk = synth::risk_assessments(&mut ctx);
    let episode = profile.emits_episode.then(|| synth::episode(&mut ctx));

    let (group, member) = match profile.group_scope {
        GroupScope::PerRecord => (Some(synth::record_group(&ctx, member)), None),
        GroupScope::Batch => (None, Some(member)),
    };

    let diagnostics = ctx.into_diagnostics();
    debug!(
        version = %profile.version,
        risk = risk.len(),
        diagnostics = diagnostics.len(),
        "record synthesized"
    );

    RecordSynthesis {
        bundle: Some(ResourceBundle {
            mbi: record.mbi.clone(),
            patient,
            observation,
            coverage,
            group,
            risk,
            episode,
        }),
        member,
        diagnostics,
    }
}
