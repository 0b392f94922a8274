#![deny(unsafe_code)]

pub mod bucket;
pub mod diagnostic;
pub mod enums;
pub mod error;
pub mod fhir;
pub mod ids;
pub mod record;

pub use bucket::{Bucket, BucketSet};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use enums::{Gender, SchemaVersion};
pub use error::{ModelError, Result};
pub use fhir::{
    Address, CodeableConcept, Coding, Coverage, Decimal, EpisodeDiagnosis, EpisodeOfCare,
    Extension, ExtensionValue, Group, GroupMember, HumanName, Identifier, Meta, Observation,
    ObservationComponent, Patient, Period, Prediction, Reference, Resource, ResourceKind,
    RiskAssessment,
};
pub use ids::ResourceId;
pub use record::{AlrRecord, KvPair};
