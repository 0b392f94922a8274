use alr_model::{
    CodeableConcept, Coding, DiagnosticKind, Identifier, Observation, ObservationComponent,
    Reference, ResourceId, ResourceKind,
};

use crate::context::SynthesisContext;
use crate::profile::OBSERVATION_PROFILE;

pub const HCC_FLAG_SYSTEM: &str =
    "https://bluebutton.cms.gov/resources/variables/alr/hcc-risk-flags";
pub const BENE_ID_SYSTEM: &str = "https://bluebutton.cms.gov/resources/variables/bene_id";

/// Id of a beneficiary's risk-flag Observation, also the RiskAssessment basis.
pub fn observation_id(mbi: &str) -> String {
    ResourceId::derived("hcc-risk-flags", mbi).into_string()
}

/// HCC risk-flag Observation with one component per crosswalk hit.
///
/// Risk-flag columns absent from the crosswalk for the record's HCC version
/// are left out and reported as [`DiagnosticKind::CrosswalkMiss`].
pub fn observation(ctx: &mut SynthesisContext<'_>) -> Observation {
    let coding = Coding {
        system: Some(HCC_FLAG_SYSTEM.to_string()),
        version: Some(ctx.hcc_version.to_string()),
        code: Some("hccRiskFlags".to_string()),
        display: None,
    };
    let code = CodeableConcept {
        coding: vec![coding],
        text: Some("HCC Risk Flags".to_string()),
    };

    let (buckets, crosswalk, version) = (ctx.buckets, ctx.crosswalk, ctx.hcc_version);
    let mut component = Vec::new();
    for pair in &buckets.risk_flag {
        if pair.is_empty() {
            ctx.skip_empty(&pair.key);
            continue;
        }
        let Some(entry) = crosswalk.lookup(version, &pair.key) else {
            let message = format!(
                "no crosswalk entry for {} under HCC version {}",
                pair.key, version
            );
            ctx.skip_field(DiagnosticKind::CrosswalkMiss, &pair.key, message);
            continue;
        };
        let mut flag = Coding::new(HCC_FLAG_SYSTEM, &entry.flag, &entry.description);
        flag.version = Some(version.to_string());
        component.push(ObservationComponent {
            code: CodeableConcept::single(flag),
            value_string: pair.value.clone(),
        });
    }

    Observation {
        id: observation_id(ctx.mbi()),
        meta: ctx.meta(ResourceKind::Observation, OBSERVATION_PROFILE),
        status: "final".to_string(),
        code,
        subject: Reference::by_identifier(Identifier::new(BENE_ID_SYSTEM, ctx.mbi())),
        component,
    }
}
