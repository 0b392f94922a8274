//! Classification buckets for record fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::KvPair;

/// Category a record field can be classified into.
///
/// A key may land in more than one bucket; see `BucketSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// `EnrollFlagN` monthly enrollment flags.
    Enrollment,
    /// `HCC_COL_N` condition category flags.
    RiskFlag,
    /// Monthly and named risk scores.
    RiskScore,
    /// Assignment, alignment and exclusion flags.
    Group,
    /// The single `HCC_version` marker.
    HccVersion,
    /// COVID-19 episode columns.
    CovidEpisode,
}

impl Bucket {
    pub const ALL: [Bucket; 6] = [
        Bucket::Enrollment,
        Bucket::RiskFlag,
        Bucket::RiskScore,
        Bucket::Group,
        Bucket::HccVersion,
        Bucket::CovidEpisode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Enrollment => "enrollment",
            Bucket::RiskFlag => "risk_flag",
            Bucket::RiskScore => "risk_score",
            Bucket::Group => "group",
            Bucket::HccVersion => "hcc_version",
            Bucket::CovidEpisode => "covid_episode",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered per-bucket field sequences for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketSet {
    pub enrollment: Vec<KvPair>,
    pub risk_flag: Vec<KvPair>,
    pub risk_score: Vec<KvPair>,
    pub group: Vec<KvPair>,
    pub hcc_version: Vec<KvPair>,
    pub covid_episode: Vec<KvPair>,
}

impl BucketSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bucket: Bucket) -> &[KvPair] {
        match bucket {
            Bucket::Enrollment => &self.enrollment,
            Bucket::RiskFlag => &self.risk_flag,
            Bucket::RiskScore => &self.risk_score,
            Bucket::Group => &self.group,
            Bucket::HccVersion => &self.hcc_version,
            Bucket::CovidEpisode => &self.covid_episode,
        }
    }

    pub fn push(&mut self, bucket: Bucket, pair: KvPair) {
        let target = match bucket {
            Bucket::Enrollment => &mut self.enrollment,
            Bucket::RiskFlag => &mut self.risk_flag,
            Bucket::RiskScore => &mut self.risk_score,
            Bucket::Group => &mut self.group,
            Bucket::HccVersion => &mut self.hcc_version,
            Bucket::CovidEpisode => &mut self.covid_episode,
        };
        target.push(pair);
    }

    /// Value of the first non-empty HCC version marker.
    pub fn hcc_version(&self) -> Option<&str> {
        self.hcc_version
            .iter()
            .find(|pair| !pair.is_empty())
            .map(|pair| pair.value.as_str())
    }

    /// Buckets containing a pair with the given key.
    pub fn buckets_of(&self, key: &str) -> Vec<Bucket> {
        Bucket::ALL
            .into_iter()
            .filter(|bucket| self.get(*bucket).iter().any(|pair| pair.key == key))
            .collect()
    }

    pub fn len(&self) -> usize {
        Bucket::ALL
            .into_iter()
            .map(|bucket| self.get(bucket).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
