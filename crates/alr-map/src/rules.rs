//! Ordered classification rule table.
//!
//! Each rule pairs a bucket with a key pattern. Rules are evaluated
//! independently against every key, so one key may satisfy several rules.
//! The group and risk-score patterns anchor only their first alternative at
//! the start and their last alternative at the end; the alternatives in
//! between match anywhere in the key. Keys such as
//! `BENE_RSK_R_SCRE_01_CBA_FLAG` therefore land in two buckets.

use std::sync::LazyLock;

use alr_model::Bucket;
use regex::Regex;

pub const ENROLLMENT_PATTERN: &str = r"^EnrollFlag\d+$";

pub const RISK_FLAG_PATTERN: &str = r"^HCC_COL_\d+$";

pub const RISK_SCORE_PATTERN: &str = r"^(BENE_RSK_R_SCRE_\d{2,})|(((ESRD)|(DIS)|(AGDU)|(AGND)|(DEM_ESRD)|(DEM_DIS)|(DEM_AGDU)|(DEM_AGND))_SCORE)$";

pub const GROUP_PATTERN: &str = concat!(
    r"^(IN_VA_MAX)|(CBA_FLAG)|(ASSIGNMENT_TYPE)|(ASSIGNED_BEFORE)|(ASG_STATUS)|",
    r"(EXCLUDED)|(DECEASED_EXCLUDED)|(MISSING_ID_EXCLUDED)|(PART_A_B_ONLY_EXCLUDED)|",
    r"(GHP_EXCLUDED)|(OUTSIDE_US_EXCLUDED)|(OTHER_SHARED_SAV_INIT)|(VA_SELECTION_ONLY)|",
    r"(PLUR_R05)|(AB_R01)|(HMO_R03)|(NO_US_R02)|(MDM_R04)|(NOFND_R06)$"
);

pub const HCC_VERSION_PATTERN: &str = r"^HCC_version$";

pub const COVID_EPISODE_PATTERN: &str = r"^((COVID19_EPISODE)|(COVID19_MONTH(0[1-9]|1[0-2]))|(ADMISSION_DT)|(DISCHARGE_DT)|(U071)|(B9729))$";

/// A bucket and the key pattern that selects it.
#[derive(Debug)]
pub struct ClassificationRule {
    pub bucket: Bucket,
    pub regex: Regex,
}

impl ClassificationRule {
    fn new(bucket: Bucket, pattern: &str) -> Self {
        Self {
            bucket,
            regex: Regex::new(pattern).expect("Invalid classification pattern"),
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

static RULES: LazyLock<Vec<ClassificationRule>> = LazyLock::new(|| {
    vec![
        ClassificationRule::new(Bucket::Enrollment, ENROLLMENT_PATTERN),
        ClassificationRule::new(Bucket::RiskFlag, RISK_FLAG_PATTERN),
        ClassificationRule::new(Bucket::RiskScore, RISK_SCORE_PATTERN),
        ClassificationRule::new(Bucket::Group, GROUP_PATTERN),
        ClassificationRule::new(Bucket::HccVersion, HCC_VERSION_PATTERN),
        ClassificationRule::new(Bucket::CovidEpisode, COVID_EPISODE_PATTERN),
    ]
});

/// The rule table in evaluation order.
pub fn rules() -> &'static [ClassificationRule] {
    &RULES
}

/// Every bucket whose rule matches `key`, in rule order.
pub fn matching_buckets(key: &str) -> Vec<Bucket> {
    rules()
        .iter()
        .filter(|rule| rule.matches(key))
        .map(|rule| rule.bucket)
        .collect()
}
