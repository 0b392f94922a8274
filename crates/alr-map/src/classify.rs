use std::cmp::Ordering;

use alr_model::{AlrRecord, Bucket, BucketSet, KvPair};
use tracing::{debug, trace};

use crate::rules::rules;

/// Partition a record's fields into buckets.
///
/// Every field is tested against every rule; a field matching several rules
/// is appended to each of those buckets. Fields matching no rule are logged
/// and dropped. Buckets keep key order, except the risk-score bucket which
/// is ordered by numeric suffix so monthly scores read month 1, 2, ... 12.
pub fn classify(record: &AlrRecord) -> BucketSet {
    let mut buckets = BucketSet::new();
    for pair in record.pairs() {
        classify_pair(&mut buckets, pair);
    }
    buckets.risk_score.sort_by(|a, b| natural_cmp(&a.key, &b.key));
    trace!(fields = record.fields.len(), classified = buckets.len(), "classified record");
    buckets
}

fn classify_pair(buckets: &mut BucketSet, pair: KvPair) {
    if pair.is_empty() {
        trace!(key = %pair.key, "empty value");
    }
    let mut matched: Option<Bucket> = None;
    for rule in rules() {
        if !rule.matches(&pair.key) {
            continue;
        }
        if let Some(previous) = matched {
            debug!(key = %pair.key, first = %previous, also = %rule.bucket, "field matches several buckets");
        }
        matched = Some(rule.bucket);
        buckets.push(rule.bucket, pair.clone());
    }
    if matched.is_none() {
        debug!(key = %pair.key, "field matches no classification rule");
    }
}

/// Compare keys by their non-numeric stem, then by trailing number.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (stem_a, num_a) = split_trailing_number(a);
    let (stem_b, num_b) = split_trailing_number(b);
    stem_a
        .cmp(stem_b)
        .then(num_a.cmp(&num_b))
        .then_with(|| a.cmp(b))
}

fn split_trailing_number(key: &str) -> (&str, Option<u64>) {
    let stem = key.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &key[stem.len()..];
    (stem, digits.parse().ok())
}
