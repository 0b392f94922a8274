//! COVID-19 EpisodeOfCare.

use alr_map::CovidField;
use alr_model::{
    DiagnosticKind, EpisodeDiagnosis, EpisodeOfCare, Extension, Identifier, Period, Reference,
    ResourceId, ResourceKind,
};
use tracing::debug;

use crate::context::SynthesisContext;
use crate::datetime::{EPISODE_DATE_FORMAT, parse_episode_date};
use crate::profile::EPISODE_PROFILE;

pub const COVID_FLAG_URL: &str = "http://alr.cms.gov/ig/StructureDefinition/ext-covidFlag";
pub const COVID_EPISODE_URL: &str = "http://alr.cms.gov/ig/StructureDefinition/ext-covidEpisode";
pub const ICD10_SYSTEM: &str = "http://hl7.org/fhir/sid/icd-10";

pub fn episode(ctx: &mut SynthesisContext<'_>) -> EpisodeOfCare {
    let mut extension = Vec::new();
    let mut diagnosis = Vec::new();
    let mut period = Period::default();

    let buckets = ctx.buckets;
    for pair in &buckets.covid_episode {
        if pair.is_empty() {
            ctx.skip_empty(&pair.key);
            continue;
        }
        let Some(field) = CovidField::from_key(&pair.key) else {
            debug!(key = %pair.key, "episode key has no field mapping");
            continue;
        };
        match field {
            CovidField::AdmissionDate => period.start = episode_date(ctx, &pair.key, &pair.value),
            CovidField::DischargeDate => period.end = episode_date(ctx, &pair.key, &pair.value),
            CovidField::Month(month) => {
                if let Some(flag) = ctx.parse_int(&pair.key, &pair.value) {
                    extension.push(Extension::nested(
                        COVID_FLAG_URL,
                        vec![
                            Extension::integer("flag", flag),
                            Extension::integer("monthNum", i32::from(month)),
                        ],
                    ));
                }
            }
            CovidField::Episode => {
                if let Some(count) = ctx.parse_int(&pair.key, &pair.value) {
                    extension.push(Extension::integer(COVID_EPISODE_URL, count));
                }
            }
            CovidField::Diagnosis(code) => {
                if pair.value == "0" {
                    continue;
                }
                diagnosis.push(EpisodeDiagnosis {
                    condition: Reference::by_identifier(Identifier::new(ICD10_SYSTEM, code)),
                });
            }
        }
    }

    EpisodeOfCare {
        id: ResourceId::derived("episode", ctx.mbi()).into_string(),
        meta: ctx.meta(ResourceKind::EpisodeOfCare, EPISODE_PROFILE),
        extension,
        status: "finished".to_string(),
        diagnosis,
        patient: Reference::to("Patient", ctx.mbi()),
        period,
    }
}

fn episode_date(
    ctx: &mut SynthesisContext<'_>,
    key: &str,
    value: &str,
) -> Option<chrono::NaiveDate> {
    let parsed = parse_episode_date(value);
    if parsed.is_none() {
        ctx.skip_field(
            DiagnosticKind::UnparseableDate,
            key,
            format!("{value:?} does not match {EPISODE_DATE_FORMAT}"),
        );
    }
    parsed
}
