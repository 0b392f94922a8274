//! Type-safe enumerations for ALR output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Output schema revision.
///
/// - **V1**: legacy ALR profiles on FHIR STU3
/// - **V2**: current ALR profiles on FHIR R4
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    V1,
    #[default]
    V2,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V2 => "v2",
        }
    }

    /// FHIR release the schema is built on.
    pub fn fhir_release(&self) -> &'static str {
        match self {
            SchemaVersion::V1 => "STU3",
            SchemaVersion::V2 => "R4",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = ModelError;

    /// Accepts the schema tag or the FHIR release name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v1" | "1" | "stu3" => Ok(SchemaVersion::V1),
            "v2" | "2" | "r4" => Ok(SchemaVersion::V2),
            _ => Err(ModelError::UnknownSchemaVersion(s.to_string())),
        }
    }
}

/// Administrative gender as asserted on the Patient resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Map the extract's sex code; any other code asserts no gender.
    pub fn from_sex_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(Gender::Unknown),
            "1" => Some(Gender::Male),
            "2" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Unknown => "unknown",
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
