#![deny(unsafe_code)]

pub mod classify;
pub mod descriptions;
pub mod fields;
pub mod rules;

pub use classify::{classify, natural_cmp};
pub use descriptions::{EXCLUSION_REASONS, REASSIGNMENT_REASONS, reason_description};
pub use fields::{CovidField, GroupField, RiskScoreKind, monthly_index};
pub use rules::{ClassificationRule, matching_buckets, rules};
