//! FHIR resource shapes emitted for ALR data.
//!
//! Only the elements the ALR profiles populate are modelled. Field order
//! follows the FHIR JSON element order, and empty optional elements are left
//! out of the serialized form.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

use crate::enums::Gender;
use crate::error::ModelError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub profile: Vec<String>,
}

impl Meta {
    pub fn profile(uri: &str) -> Self {
        Self {
            last_updated: None,
            profile: vec![uri.to_string()],
        }
    }

    #[must_use]
    pub fn with_last_updated(mut self, instant: Option<String>) -> Self {
        self.last_updated = instant;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: &str, code: &str, display: &str) -> Self {
        Self {
            system: Some(system.to_string()),
            version: None,
            code: Some(code.to_string()),
            display: Some(display.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodeableConcept {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    pub fn single(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            text: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Identifier {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Identifier {
    pub fn new(system: &str, value: &str) -> Self {
        Self {
            kind: None,
            system: Some(system.to_string()),
            value: Some(value.to_string()),
        }
    }

    /// Identifier typed by a coding rather than scoped by a system.
    pub fn typed(kind: Coding, value: &str) -> Self {
        Self {
            kind: Some(CodeableConcept::single(kind)),
            system: None,
            value: Some(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
}

impl Reference {
    /// Literal reference such as `Patient/123`.
    pub fn to(resource_type: &str, id: &str) -> Self {
        Self {
            reference: Some(format!("{resource_type}/{id}")),
            identifier: None,
        }
    }

    pub fn by_identifier(identifier: Identifier) -> Self {
        Self {
            reference: None,
            identifier: Some(identifier),
        }
    }
}

/// `value[x]` choices used by ALR extensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExtensionValue {
    #[serde(rename = "valueString")]
    String(String),
    #[serde(rename = "valueBoolean")]
    Boolean(bool),
    #[serde(rename = "valueInteger")]
    Integer(i32),
    #[serde(rename = "valueCode")]
    Code(String),
    #[serde(rename = "valueCoding")]
    Coding(Coding),
    #[serde(rename = "valueIdentifier")]
    Identifier(Identifier),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extension {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    pub url: String,
    #[serde(flatten)]
    pub value: Option<ExtensionValue>,
}

impl Extension {
    pub fn with_value(url: &str, value: ExtensionValue) -> Self {
        Self {
            extension: Vec::new(),
            url: url.to_string(),
            value: Some(value),
        }
    }

    /// Complex extension carrying only sub-extensions.
    pub fn nested(url: &str, extension: Vec<Extension>) -> Self {
        Self {
            extension,
            url: url.to_string(),
            value: None,
        }
    }

    pub fn string(url: &str, value: &str) -> Self {
        Self::with_value(url, ExtensionValue::String(value.to_string()))
    }

    pub fn boolean(url: &str, value: bool) -> Self {
        Self::with_value(url, ExtensionValue::Boolean(value))
    }

    pub fn integer(url: &str, value: i32) -> Self {
        Self::with_value(url, ExtensionValue::Integer(value))
    }

    pub fn code(url: &str, value: &str) -> Self {
        Self::with_value(url, ExtensionValue::Code(value.to_string()))
    }

    pub fn coding(url: &str, value: Coding) -> Self {
        Self::with_value(url, ExtensionValue::Coding(value))
    }

    pub fn identifier(url: &str, value: Identifier) -> Self {
        Self::with_value(url, ExtensionValue::Identifier(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HumanName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.extension.is_empty() && self.district.is_none() && self.state.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl Period {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub meta: Meta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    pub identifier: Vec<Identifier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_date_time: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coverage {
    pub id: String,
    pub meta: Meta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    pub beneficiary: Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMember {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    pub entity: Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub id: String,
    pub meta: Meta,
    #[serde(rename = "type")]
    pub kind: String,
    pub actual: bool,
    pub member: Vec<GroupMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub id: String,
    pub probability_decimal: Decimal,
}

/// A FHIR decimal kept as its source text.
///
/// The text must be a finite JSON number. It is written out unchanged, so
/// trailing zeros and digits beyond `f64` precision survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal(String);

impl Decimal {
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let text = text.trim();
        let finite = text.parse::<f64>().is_ok_and(f64::is_finite);
        if !finite || RawValue::from_string(text.to_string()).is_err() {
            return Err(ModelError::InvalidDecimal(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.0.clone()).map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub id: String,
    pub meta: Meta,
    pub status: String,
    pub code: CodeableConcept,
    pub subject: Reference,
    pub basis: Vec<Reference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prediction: Vec<Prediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    pub code: CodeableConcept,
    pub value_string: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub id: String,
    pub meta: Meta,
    pub status: String,
    pub code: CodeableConcept,
    pub subject: Reference,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub component: Vec<ObservationComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeDiagnosis {
    pub condition: Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeOfCare {
    pub id: String,
    pub meta: Meta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    pub status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnosis: Vec<EpisodeDiagnosis>,
    pub patient: Reference,
    #[serde(skip_serializing_if = "Period::is_empty")]
    pub period: Period,
}

/// Resource kinds in bundle output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ResourceKind {
    Patient,
    Observation,
    Coverage,
    Group,
    RiskAssessment,
    EpisodeOfCare,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Patient => "Patient",
            ResourceKind::Observation => "Observation",
            ResourceKind::Coverage => "Coverage",
            ResourceKind::Group => "Group",
            ResourceKind::RiskAssessment => "RiskAssessment",
            ResourceKind::EpisodeOfCare => "EpisodeOfCare",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any resource the synthesizers produce, tagged with its `resourceType`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Patient(Patient),
    Observation(Observation),
    Coverage(Coverage),
    Group(Group),
    RiskAssessment(RiskAssessment),
    EpisodeOfCare(EpisodeOfCare),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Patient(_) => ResourceKind::Patient,
            Resource::Observation(_) => ResourceKind::Observation,
            Resource::Coverage(_) => ResourceKind::Coverage,
            Resource::Group(_) => ResourceKind::Group,
            Resource::RiskAssessment(_) => ResourceKind::RiskAssessment,
            Resource::EpisodeOfCare(_) => ResourceKind::EpisodeOfCare,
        }
    }

    pub fn resource_type(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn id(&self) -> &str {
        match self {
            Resource::Patient(r) => &r.id,
            Resource::Observation(r) => &r.id,
            Resource::Coverage(r) => &r.id,
            Resource::Group(r) => &r.id,
            Resource::RiskAssessment(r) => &r.id,
            Resource::EpisodeOfCare(r) => &r.id,
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            Resource::Patient(r) => &r.meta,
            Resource::Observation(r) => &r.meta,
            Resource::Coverage(r) => &r.meta,
            Resource::Group(r) => &r.meta,
            Resource::RiskAssessment(r) => &r.meta,
            Resource::EpisodeOfCare(r) => &r.meta,
        }
    }
}
