//! RiskAssessment: one resource per named score plus the monthly aggregate.

use alr_map::{RiskScoreKind, monthly_index};
use alr_model::{
    CodeableConcept, Coding, Prediction, Reference, ResourceId, ResourceKind, RiskAssessment,
};
use tracing::debug;

use crate::context::SynthesisContext;
use crate::profile::RISK_ASSESSMENT_PROFILE;
use crate::synth::observation::observation_id;

const SYSTEM_PREFIX: &str = "https://bluebutton.cms.gov/resources/variables/alr/";

/// Fixed coding of each score family's RiskAssessment. The id prefix is
/// combined with the MBI into a per-beneficiary id.
struct ScoreIdentity {
    id_prefix: &'static str,
    system_suffix: &'static str,
    display: &'static str,
}

fn identity(kind: RiskScoreKind) -> ScoreIdentity {
    let (id_prefix, system_suffix, display) = match kind {
        RiskScoreKind::Esrd => (
            "risk-score-esrd",
            "esrd-score",
            "CMS-HCC Risk Score for ESRD",
        ),
        RiskScoreKind::Disabled => (
            "risk-score-disabled",
            "disabled-score",
            "CMS-HCC Risk Score for disabled",
        ),
        RiskScoreKind::AgedDual => (
            "risk-score-aged-dual",
            "aged-dual-score",
            "CMS-HCC Risk Score for Aged/Dual",
        ),
        RiskScoreKind::AgedNonDual => (
            "risk-score-aged-non-dual",
            "aged-non-dual-score",
            "CMS-HCC Risk Score for Aged/Non-dual Status",
        ),
        RiskScoreKind::DemoEsrd => (
            "risk-score-demo-esrd",
            "demo-esrd-score",
            "Demographic Risk Score for ESRD Status",
        ),
        RiskScoreKind::DemoDisabled => (
            "risk-score-demo-disabled",
            "demo-disabled-score",
            "Demographic Risk Score for Disabled Status",
        ),
        RiskScoreKind::DemoAgedDual => (
            "risk-score-demo-aged-dual",
            "demo-aged-dual-score",
            "Demographic Risk Score for Aged/Dual Status",
        ),
        RiskScoreKind::DemoAgedNonDual => (
            "risk-score-demo-aged-non-dual",
            "demo-aged-non-dual-score",
            "Demographic Risk Score for Aged/Non-dual Status",
        ),
        RiskScoreKind::Monthly => (
            "monthly-risk-score",
            "bene_rsk_r_scre",
            "CMS-HCC Monthly Risk Scores",
        ),
    };
    ScoreIdentity {
        id_prefix,
        system_suffix,
        display,
    }
}

/// Named scores in bucket order, then the monthly aggregate.
///
/// The aggregate is always present, possibly with no predictions.
pub fn risk_assessments(ctx: &mut SynthesisContext<'_>) -> Vec<RiskAssessment> {
    let mut named = Vec::new();
    let mut monthly = Vec::new();

    let buckets = ctx.buckets;
    for pair in &buckets.risk_score {
        if pair.is_empty() {
            ctx.skip_empty(&pair.key);
            continue;
        }
        match RiskScoreKind::from_key(&pair.key) {
            Some(RiskScoreKind::Monthly) => {
                let Some(month) = monthly_index(&pair.key) else {
                    continue;
                };
                if let Some(score) = ctx.parse_decimal(&pair.key, &pair.value) {
                    monthly.push((month, Prediction {
                        id: pair.key.clone(),
                        probability_decimal: score,
                    }));
                }
            }
            Some(kind) => {
                if let Some(score) = ctx.parse_decimal(&pair.key, &pair.value) {
                    named.push(assessment(
                        ctx,
                        kind,
                        vec![Prediction {
                            id: pair.key.clone(),
                            probability_decimal: score,
                        }],
                    ));
                }
            }
            None => {
                debug!(key = %pair.key, "risk score key has no score family");
            }
        }
    }

    monthly.sort_by_key(|(month, _)| *month);
    let predictions = monthly.into_iter().map(|(_, p)| p).collect();
    named.push(assessment(ctx, RiskScoreKind::Monthly, predictions));
    named
}

fn assessment(
    ctx: &SynthesisContext<'_>,
    kind: RiskScoreKind,
    prediction: Vec<Prediction>,
) -> RiskAssessment {
    let identity = identity(kind);
    let system = format!("{SYSTEM_PREFIX}{}", identity.system_suffix);
    RiskAssessment {
        id: ResourceId::derived(identity.id_prefix, ctx.mbi()).into_string(),
        meta: ctx.meta(ResourceKind::RiskAssessment, RISK_ASSESSMENT_PROFILE),
        status: "final".to_string(),
        code: CodeableConcept::single(Coding::new(&system, kind.key(), identity.display)),
        subject: Reference::to("Patient", ctx.mbi()),
        basis: vec![Reference::to("Observation", &observation_id(ctx.mbi()))],
        prediction,
    }
}
