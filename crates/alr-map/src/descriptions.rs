//! Human descriptions for exclusion and reassignment reason flags.

/// Exclusion reasons reported by every schema version.
pub const EXCLUSION_REASONS: [&str; 6] = [
    "DECEASED_EXCLUDED",
    "MISSING_ID_EXCLUDED",
    "PART_A_B_ONLY_EXCLUDED",
    "GHP_EXCLUDED",
    "OUTSIDE_US_EXCLUDED",
    "OTHER_SHARED_SAV_INIT",
];

/// Reassignment reason codes added by the v2 schema.
pub const REASSIGNMENT_REASONS: [&str; 6] = [
    "PLUR_R05", "AB_R01", "HMO_R03", "NO_US_R02", "MDM_R04", "NOFND_R06",
];

const DESCRIPTIONS: [(&str, &str); 12] = [
    (
        "DECEASED_EXCLUDED",
        "Beneficiary had a date of death prior to the start of the performance year",
    ),
    ("MISSING_ID_EXCLUDED", "Beneficiary identifier is missing"),
    (
        "PART_A_B_ONLY_EXCLUDED",
        "Beneficiary had at least one month of Part A-only Or Part B-only Coverage",
    ),
    (
        "GHP_EXCLUDED",
        "Beneficiary had at least one month in a Medicare Health Plan",
    ),
    (
        "OUTSIDE_US_EXCLUDED",
        "Beneficiary does not reside in the United States",
    ),
    (
        "OTHER_SHARED_SAV_INIT",
        "Beneficiary included in other Shared Savings Initiatives",
    ),
    (
        "PLUR_R05",
        "Beneficiary did not receive the plurality of their primary care services from the ACO",
    ),
    (
        "AB_R01",
        "Beneficiary had at least 1 month of Part A-only or Part B-only coverage",
    ),
    (
        "HMO_R03",
        "Beneficiary had at least 1 month in a Medicare health plan",
    ),
    (
        "NO_US_R02",
        "Beneficiary does not reside in the United States",
    ),
    (
        "MDM_R04",
        "Beneficiary included in other Shared Savings Initiatives",
    ),
    (
        "NOFND_R06",
        "Beneficiary did not have a physician visit with an ACO professional or was not assigned for any other reason not listed",
    ),
];

/// Description for a reason flag.
pub fn reason_description(key: &str) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(code, _)| *code == key)
        .map(|(_, description)| *description)
}

/// The static code for a reason flag key, if it is one.
pub fn reason_code(key: &str) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(code, _)| *code == key)
        .map(|(code, _)| *code)
}
