//! Flat beneficiary records as delivered by the ALR extract.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Name of the field carrying the HCC crosswalk version for a record.
pub const HCC_VERSION_KEY: &str = "HCC_version";

/// One beneficiary row of an Assignment List Report.
///
/// Identity columns are typed; every other column of the extract lands in
/// `fields` untouched, including empty values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlrRecord {
    /// Medicare Beneficiary Identifier.
    pub mbi: String,
    /// Legacy Health Insurance Claim Number, when the extract still carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hicn: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Raw sex code from the extract (`0`, `1`, `2`).
    #[serde(default)]
    pub sex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    /// Capture time of the extract row; stamped as `meta.lastUpdated`.
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl AlrRecord {
    pub fn new(mbi: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            mbi: mbi.into(),
            hicn: None,
            first_name: String::new(),
            last_name: String::new(),
            sex: String::new(),
            birth_date: None,
            death_date: None,
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the field value, treating an empty string as absent.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Iterate every field as a key-value pair in key order.
    pub fn pairs(&self) -> impl Iterator<Item = KvPair> + '_ {
        self.fields
            .iter()
            .map(|(key, value)| KvPair::new(key.clone(), value.clone()))
    }
}

/// A single `(key, value)` column of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KvPair {
    pub key: String,
    pub value: String,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Empty values are never emitted into resources.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
