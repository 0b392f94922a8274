//! Meaning of individual keys within a bucket.
//!
//! Bucket rules decide which synthesizer sees a key; these exact-match
//! lookups decide what the synthesizer does with it.

use std::fmt;

/// Keys of the group bucket that carry a meaning of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    /// `EXCLUDED`: the beneficiary was dropped from the assignment.
    ChangeType,
    /// One of the exclusion or reassignment reason flags.
    ChangeReason(&'static str),
    /// `CBA_FLAG`
    ClaimsBasedAssignmentFlag,
    /// `ASSIGNMENT_TYPE`
    ClaimsBasedAssignmentStep,
    /// `ASG_STATUS`
    NewlyAssigned,
    /// `ASSIGNED_BEFORE`
    PreviouslyAssigned,
    /// `IN_VA_MAX`
    VoluntaryAlignment,
    /// `VA_SELECTION_ONLY`
    VaSelectionOnly,
}

impl GroupField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "EXCLUDED" => Some(GroupField::ChangeType),
            "CBA_FLAG" => Some(GroupField::ClaimsBasedAssignmentFlag),
            "ASSIGNMENT_TYPE" => Some(GroupField::ClaimsBasedAssignmentStep),
            "ASG_STATUS" => Some(GroupField::NewlyAssigned),
            "ASSIGNED_BEFORE" => Some(GroupField::PreviouslyAssigned),
            "IN_VA_MAX" => Some(GroupField::VoluntaryAlignment),
            "VA_SELECTION_ONLY" => Some(GroupField::VaSelectionOnly),
            _ => crate::descriptions::reason_code(key).map(GroupField::ChangeReason),
        }
    }
}

/// The nine risk-score families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskScoreKind {
    Esrd,
    Disabled,
    AgedDual,
    AgedNonDual,
    DemoEsrd,
    DemoDisabled,
    DemoAgedDual,
    DemoAgedNonDual,
    /// `BENE_RSK_R_SCRE_NN`, aggregated into one resource.
    Monthly,
}

impl RiskScoreKind {
    pub const NAMED: [RiskScoreKind; 8] = [
        RiskScoreKind::Esrd,
        RiskScoreKind::Disabled,
        RiskScoreKind::AgedDual,
        RiskScoreKind::AgedNonDual,
        RiskScoreKind::DemoEsrd,
        RiskScoreKind::DemoDisabled,
        RiskScoreKind::DemoAgedDual,
        RiskScoreKind::DemoAgedNonDual,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ESRD_SCORE" => Some(RiskScoreKind::Esrd),
            "DIS_SCORE" => Some(RiskScoreKind::Disabled),
            "AGDU_SCORE" => Some(RiskScoreKind::AgedDual),
            "AGND_SCORE" => Some(RiskScoreKind::AgedNonDual),
            "DEM_ESRD_SCORE" => Some(RiskScoreKind::DemoEsrd),
            "DEM_DIS_SCORE" => Some(RiskScoreKind::DemoDisabled),
            "DEM_AGDU_SCORE" => Some(RiskScoreKind::DemoAgedDual),
            "DEM_AGND_SCORE" => Some(RiskScoreKind::DemoAgedNonDual),
            _ => monthly_index(key).map(|_| RiskScoreKind::Monthly),
        }
    }

    /// Field name in the extract (`BENE_RSK_R_SCRE` for the monthly family).
    pub fn key(&self) -> &'static str {
        match self {
            RiskScoreKind::Esrd => "ESRD_SCORE",
            RiskScoreKind::Disabled => "DIS_SCORE",
            RiskScoreKind::AgedDual => "AGDU_SCORE",
            RiskScoreKind::AgedNonDual => "AGND_SCORE",
            RiskScoreKind::DemoEsrd => "DEM_ESRD_SCORE",
            RiskScoreKind::DemoDisabled => "DEM_DIS_SCORE",
            RiskScoreKind::DemoAgedDual => "DEM_AGDU_SCORE",
            RiskScoreKind::DemoAgedNonDual => "DEM_AGND_SCORE",
            RiskScoreKind::Monthly => "BENE_RSK_R_SCRE",
        }
    }
}

impl fmt::Display for RiskScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

const MONTHLY_PREFIX: &str = "BENE_RSK_R_SCRE_";

/// Month number of a `BENE_RSK_R_SCRE_NN` key (two or more digits).
pub fn monthly_index(key: &str) -> Option<u32> {
    let digits = key.strip_prefix(MONTHLY_PREFIX)?;
    if digits.len() < 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Keys of the COVID-19 episode bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CovidField {
    AdmissionDate,
    DischargeDate,
    /// `COVID19_MONTHNN`, month 1 through 12.
    Month(u8),
    Episode,
    /// `U071` or `B9729`, ICD-10 diagnosis flags.
    Diagnosis(&'static str),
}

pub const COVID_DIAGNOSIS_CODES: [&str; 2] = ["U071", "B9729"];

impl CovidField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ADMISSION_DT" => Some(CovidField::AdmissionDate),
            "DISCHARGE_DT" => Some(CovidField::DischargeDate),
            "COVID19_EPISODE" => Some(CovidField::Episode),
            "U071" => Some(CovidField::Diagnosis("U071")),
            "B9729" => Some(CovidField::Diagnosis("B9729")),
            _ => {
                let digits = key.strip_prefix("COVID19_MONTH")?;
                if digits.len() != 2 {
                    return None;
                }
                let month: u8 = digits.parse().ok()?;
                (1..=12).contains(&month).then_some(CovidField::Month(month))
            }
        }
    }
}
