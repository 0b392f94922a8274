//! Version-specific construction rules.
//!
//! Both schema versions share one set of synthesizers; a [`SchemaProfile`]
//! carries everything that differs between them.

use alr_model::{ResourceKind, SchemaVersion};

pub const PATIENT_PROFILE: &str = "http://alr.cms.gov/ig/StructureDefinition/alr-Patient";
pub const COVERAGE_PROFILE: &str = "http://alr.cms.gov/ig/StructureDefinition/alr-Coverage";
pub const GROUP_PROFILE: &str = "http://alr.cms.gov/ig/StructureDefinition/alr-Group";
pub const RISK_ASSESSMENT_PROFILE: &str =
    "http://alr.cms.gov/ig/StructureDefinition/alr-RiskAssessment";
pub const OBSERVATION_PROFILE: &str = "http://alr.cms.gov/ig/StructureDefinition/alr-HccRiskFlag";
pub const EPISODE_PROFILE: &str = "http://alr.cms.gov/ig/StructureDefinition/alr-covidEpisode";

/// Where the Group resource is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupScope {
    /// One Group per record, emitted inside the record's bundle.
    PerRecord,
    /// One Group per batch with a member per record, emitted after all records.
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaProfile {
    pub version: SchemaVersion,
    /// Resource kinds that carry `meta.lastUpdated`.
    pub stamped: &'static [ResourceKind],
    pub group_scope: GroupScope,
    /// Whether the reassignment reason codes (`PLUR_R05`, ...) are reported.
    pub reassignment_reasons: bool,
    /// Whether a COVID-19 EpisodeOfCare is part of each bundle.
    pub emits_episode: bool,
}

impl SchemaProfile {
    pub const V1: SchemaProfile = SchemaProfile {
        version: SchemaVersion::V1,
        stamped: &[
            ResourceKind::Coverage,
            ResourceKind::Observation,
            ResourceKind::Group,
        ],
        group_scope: GroupScope::PerRecord,
        reassignment_reasons: false,
        emits_episode: false,
    };

    pub const V2: SchemaProfile = SchemaProfile {
        version: SchemaVersion::V2,
        stamped: &[
            ResourceKind::Patient,
            ResourceKind::Observation,
            ResourceKind::Coverage,
            ResourceKind::Group,
            ResourceKind::RiskAssessment,
            ResourceKind::EpisodeOfCare,
        ],
        group_scope: GroupScope::Batch,
        reassignment_reasons: true,
        emits_episode: true,
    };

    pub fn for_version(version: SchemaVersion) -> &'static SchemaProfile {
        match version {
            SchemaVersion::V1 => &Self::V1,
            SchemaVersion::V2 => &Self::V2,
        }
    }

    pub fn stamps(&self, kind: ResourceKind) -> bool {
        self.stamped.contains(&kind)
    }

    /// Whether a change-reason flag is reported under this profile.
    pub fn reports_reason(&self, code: &str) -> bool {
        alr_map::EXCLUSION_REASONS.contains(&code)
            || (self.reassignment_reasons && alr_map::REASSIGNMENT_REASONS.contains(&code))
    }
}
