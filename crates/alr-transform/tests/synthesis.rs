use alr_model::{
    AlrRecord, DiagnosticKind, Extension, ExtensionValue, GroupMember, Resource, ResourceId,
    ResourceKind, SchemaVersion,
};
use alr_standards::{CrosswalkTable, HccEntry};
use alr_transform::synth::group::{
    CHANGE_REASON_URL, CHANGE_TYPE_URL, CLAIMS_BASED_ASSIGNMENT_FLAG_URL,
    CLAIMS_BASED_ASSIGNMENT_STEP_URL,
};
use alr_transform::synth::episode::{COVID_EPISODE_URL, COVID_FLAG_URL};
use alr_transform::{GroupScope, SchemaProfile, synth, synthesize_record};
use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

const MBI: &str = "1S00E00AA00";

fn record() -> AlrRecord {
    AlrRecord::new(MBI, Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap())
}

fn crosswalk() -> CrosswalkTable {
    let mut table = CrosswalkTable::new();
    table.insert(
        "V24",
        "HCC_COL_19",
        HccEntry {
            flag: "HCC19".to_string(),
            description: "Diabetes".to_string(),
        },
    );
    table
}

fn v1() -> &'static SchemaProfile {
    SchemaProfile::for_version(SchemaVersion::V1)
}

fn v2() -> &'static SchemaProfile {
    SchemaProfile::for_version(SchemaVersion::V2)
}

fn find<'a>(extensions: &'a [Extension], url: &str) -> Option<&'a Extension> {
    extensions.iter().find(|ext| ext.url == url)
}

fn member_of(record: &AlrRecord, profile: &SchemaProfile) -> GroupMember {
    synthesize_record(record, &crosswalk(), profile)
        .member
        .expect("v2 records yield a batch member")
}

#[test]
fn enrollment_and_risk_flag_scenario() {
    let record = record()
        .with_field("EnrollFlag1", "1")
        .with_field("HCC_version", "V24")
        .with_field("HCC_COL_19", "1");

    let result = synthesize_record(&record, &crosswalk(), v2());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let bundle = result.bundle.expect("bundle");

    assert_eq!(bundle.coverage.extension.len(), 1);
    let enrollment = &bundle.coverage.extension[0].extension[0];
    assert_eq!(enrollment.url, "EnrollFlag1");
    assert_eq!(enrollment.value, Some(ExtensionValue::String("1".to_string())));

    assert_eq!(bundle.observation.component.len(), 1);
    let component = &bundle.observation.component[0];
    let coding = &component.code.coding[0];
    assert_eq!(coding.code.as_deref(), Some("HCC19"));
    assert_eq!(coding.display.as_deref(), Some("Diabetes"));
    assert_eq!(coding.version.as_deref(), Some("V24"));
    assert_eq!(component.value_string, "1");

    // Nothing for absent fields.
    assert!(bundle.patient.extension.is_empty());
    assert!(bundle.patient.address.is_empty());
    assert!(bundle.patient.name.is_empty());
    assert_eq!(bundle.risk.len(), 1);
    assert!(bundle.risk[0].prediction.is_empty());
    let episode = bundle.episode.expect("v2 emits an episode");
    assert!(episode.extension.is_empty());
    assert!(episode.diagnosis.is_empty());
    assert!(result.member.expect("member").extension.is_empty());
}

#[test]
fn missing_hcc_version_aborts_record_with_one_diagnostic() {
    let record = record()
        .with_field("EnrollFlag1", "1")
        .with_field("HCC_COL_19", "1")
        .with_field("HCC_version", "");

    for profile in [v1(), v2()] {
        let result = synthesize_record(&record, &crosswalk(), profile);
        assert!(result.bundle.is_none());
        assert!(result.member.is_none());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::MissingHccVersion);
        assert!(result.diagnostics[0].kind.aborts_record());
    }
}

#[test]
fn unparseable_assignment_type_omits_only_the_step() {
    let record = record()
        .with_field("HCC_version", "V24")
        .with_field("CBA_FLAG", "1")
        .with_field("EXCLUDED", "0")
        .with_field("ASSIGNMENT_TYPE", "notanumber");

    let result = synthesize_record(&record, &crosswalk(), v2());
    let member = result.member.expect("member");

    assert!(find(&member.extension, CLAIMS_BASED_ASSIGNMENT_STEP_URL).is_none());
    assert_eq!(
        find(&member.extension, CLAIMS_BASED_ASSIGNMENT_FLAG_URL).and_then(|e| e.value.clone()),
        Some(ExtensionValue::Boolean(true))
    );
    assert_eq!(
        find(&member.extension, CHANGE_TYPE_URL).and_then(|e| e.value.clone()),
        Some(ExtensionValue::Code("nochange".to_string()))
    );
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnparseableInteger);
    assert_eq!(result.diagnostics[0].key.as_deref(), Some("ASSIGNMENT_TYPE"));
    assert!(result.bundle.is_some());
}

#[test]
fn parsed_assignment_type_becomes_integer_step() {
    let record = record()
        .with_field("HCC_version", "V24")
        .with_field("ASSIGNMENT_TYPE", "2");
    let member = member_of(&record, v2());
    assert_eq!(
        find(&member.extension, CLAIMS_BASED_ASSIGNMENT_STEP_URL).and_then(|e| e.value.clone()),
        Some(ExtensionValue::Integer(2))
    );
}

proptest! {
    #[test]
    fn boolean_flags_are_false_only_for_zero(value in "[0-9A-Za-z]{1,4}") {
        let record = record()
            .with_field("HCC_version", "V24")
            .with_field("CBA_FLAG", value.clone());
        let member = member_of(&record, v2());
        let flag = find(&member.extension, CLAIMS_BASED_ASSIGNMENT_FLAG_URL)
            .and_then(|e| e.value.clone());
        prop_assert_eq!(flag, Some(ExtensionValue::Boolean(value != "0")));
    }

    #[test]
    fn empty_values_never_produce_output(
        keys in proptest::sample::subsequence(vec![
            "EnrollFlag1", "EnrollFlag12", "HCC_COL_19", "HCC_COL_85", "CBA_FLAG",
            "ASSIGNMENT_TYPE", "EXCLUDED", "PLUR_R05", "ESRD_SCORE", "BENE_RSK_R_SCRE_01",
            "COVID19_MONTH01", "COVID19_EPISODE", "ADMISSION_DT", "U071", "B_EM_LINE_CNT_T",
            "STATE_COUNTY_CD", "VA_TIN",
        ], 0..=17)
    ) {
        let mut record = record().with_field("HCC_version", "V24");
        for key in &keys {
            record = record.with_field(*key, "");
        }
        let result = synthesize_record(&record, &crosswalk(), v2());
        for diagnostic in &result.diagnostics {
            prop_assert_eq!(diagnostic.kind, DiagnosticKind::EmptyValue);
            prop_assert!(keys.iter().any(|key| diagnostic.key.as_deref() == Some(*key)));
        }
        let bundle = result.bundle.unwrap();
        prop_assert!(bundle.coverage.extension.is_empty());
        prop_assert!(bundle.observation.component.is_empty());
        prop_assert!(bundle.patient.extension.is_empty());
        prop_assert!(bundle.patient.address.is_empty());
        prop_assert_eq!(bundle.patient.identifier.len(), 1);
        prop_assert_eq!(bundle.risk.len(), 1);
        prop_assert!(bundle.risk[0].prediction.is_empty());
        let episode = bundle.episode.unwrap();
        prop_assert!(episode.extension.is_empty());
        prop_assert!(episode.period.is_empty());
        prop_assert!(result.member.unwrap().extension.is_empty());
    }
}

#[test]
fn empty_values_are_skipped_with_diagnostics() {
    let record = record()
        .with_field("HCC_version", "V24")
        .with_field("EnrollFlag1", "")
        .with_field("EnrollFlag2", "1")
        .with_field("HCC_COL_19", "")
        .with_field("ESRD_SCORE", "");

    let result = synthesize_record(&record, &crosswalk(), v2());
    let bundle = result.bundle.unwrap();
    assert_eq!(bundle.coverage.extension.len(), 1);
    assert!(bundle.observation.component.is_empty());
    assert_eq!(bundle.risk.len(), 1);

    let mut skipped: Vec<(DiagnosticKind, &str)> = result
        .diagnostics
        .iter()
        .map(|d| (d.kind, d.key.as_deref().unwrap_or_default()))
        .collect();
    skipped.sort();
    assert_eq!(
        skipped,
        vec![
            (DiagnosticKind::EmptyValue, "ESRD_SCORE"),
            (DiagnosticKind::EmptyValue, "EnrollFlag1"),
            (DiagnosticKind::EmptyValue, "HCC_COL_19"),
        ]
    );
}

#[test]
fn crosswalk_miss_skips_component_with_diagnostic() {
    let record = record()
        .with_field("HCC_version", "V24")
        .with_field("HCC_COL_19", "1")
        .with_field("HCC_COL_85", "1");

    let result = synthesize_record(&record, &crosswalk(), v2());
    let bundle = result.bundle.unwrap();
    assert_eq!(bundle.observation.component.len(), 1);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::CrosswalkMiss);
    assert_eq!(result.diagnostics[0].key.as_deref(), Some("HCC_COL_85"));
}

#[test]
fn v1_folds_group_into_record_and_skips_episode() {
    let record = record()
        .with_field("HCC_version", "V24")
        .with_field("CBA_FLAG", "1");

    let result = synthesize_record(&record, &crosswalk(), v1());
    assert!(result.member.is_none());
    let bundle = result.bundle.unwrap();
    assert!(bundle.episode.is_none());
    let group = bundle.group.as_ref().expect("v1 group");
    assert!(group.id.starts_with("group-"));
    assert_eq!(group.member.len(), 1);
    assert_eq!(group.member[0].entity.reference.as_deref(), Some("Patient/1S00E00AA00"));
    assert_eq!(group.meta.last_updated.as_deref(), Some("2021-03-01T00:00:00Z"));

    // v1 stamps only Coverage, Observation and Group.
    assert!(bundle.patient.meta.last_updated.is_none());
    assert!(bundle.risk.iter().all(|r| r.meta.last_updated.is_none()));
    assert!(bundle.coverage.meta.last_updated.is_some());
    assert!(bundle.observation.meta.last_updated.is_some());

    let kinds: Vec<ResourceKind> = bundle.into_resources().iter().map(|r| r.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ResourceKind::Patient,
            ResourceKind::Observation,
            ResourceKind::Coverage,
            ResourceKind::Group,
            ResourceKind::RiskAssessment,
        ]
    );
}

#[test]
fn v2_stamps_every_resource_and_defers_group() {
    let record = record().with_field("HCC_version", "V24");
    let result = synthesize_record(&record, &crosswalk(), v2());
    assert_eq!(v2().group_scope, GroupScope::Batch);
    let bundle = result.bundle.unwrap();
    assert!(bundle.group.is_none());
    let resources = bundle.into_resources();
    for resource in &resources {
        assert_eq!(
            resource.meta().last_updated.as_deref(),
            Some("2021-03-01T00:00:00Z"),
            "{}",
            resource.kind()
        );
    }
    assert_eq!(
        resources.last().map(|r| r.kind()),
        Some(ResourceKind::EpisodeOfCare)
    );
}

#[test]
fn batch_group_collects_members() {
    let members: Vec<GroupMember> = ["A", "B", "C"]
        .iter()
        .map(|mbi| {
            let record = AlrRecord::new(*mbi, Utc::now())
                .with_field("HCC_version", "V24")
                .with_field("ASG_STATUS", "1");
            member_of(&record, v2())
        })
        .collect();
    let timestamp = Utc.with_ymd_and_hms(2021, 4, 1, 8, 0, 0).unwrap();

    let group = synth::batch_group(v2(), "batch-42", &timestamp, members);
    assert_eq!(group.id, "batch-42");
    assert_eq!(group.kind, "person");
    assert!(group.actual);
    assert_eq!(group.meta.last_updated.as_deref(), Some("2021-04-01T08:00:00Z"));
    let refs: Vec<_> = group
        .member
        .iter()
        .filter_map(|m| m.entity.reference.as_deref())
        .collect();
    assert_eq!(refs, vec!["Patient/A", "Patient/B", "Patient/C"]);
}

#[test]
fn change_reasons_follow_schema_version() {
    let record = record()
        .with_field("HCC_version", "V24")
        .with_field("EXCLUDED", "1")
        .with_field("DECEASED_EXCLUDED", "1")
        .with_field("PART_A_B_ONLY_EXCLUDED", "0")
        .with_field("PLUR_R05", "1");

    let codes = |profile: &SchemaProfile| -> Vec<String> {
        let member = synthesize_record(&record, &crosswalk(), profile);
        let extensions = match profile.group_scope {
            GroupScope::Batch => member.member.unwrap().extension,
            GroupScope::PerRecord => member.bundle.unwrap().group.unwrap().member[0]
                .extension
                .clone(),
        };
        assert_eq!(
            find(&extensions, CHANGE_TYPE_URL).and_then(|e| e.value.clone()),
            Some(ExtensionValue::Code("dropped".to_string()))
        );
        find(&extensions, CHANGE_REASON_URL)
            .map(|reason| {
                reason
                    .extension
                    .iter()
                    .filter_map(|sub| match &sub.value {
                        Some(ExtensionValue::Coding(coding)) => coding.code.clone(),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    assert_eq!(codes(v1()), vec!["DECEASED_EXCLUDED"]);
    let mut v2_codes = codes(v2());
    v2_codes.sort();
    assert_eq!(v2_codes, vec!["DECEASED_EXCLUDED", "PLUR_R05"]);
}

#[test]
fn risk_scores_split_named_and_monthly() {
    let record = record()
        .with_field("HCC_version", "V24")
        .with_field("ESRD_SCORE", "1.25")
        .with_field("DEM_AGND_SCORE", "abc")
        .with_field("BENE_RSK_R_SCRE_10", "0.9")
        .with_field("BENE_RSK_R_SCRE_02", "1.1")
        .with_field("BENE_RSK_R_SCRE_01", "1.0");

    let result = synthesize_record(&record, &crosswalk(), v2());
    let bundle = result.bundle.unwrap();

    assert_eq!(bundle.risk.len(), 2);
    let esrd = &bundle.risk[0];
    assert_eq!(esrd.id, ResourceId::derived("risk-score-esrd", MBI).as_str());
    assert_eq!(esrd.prediction[0].probability_decimal.as_str(), "1.25");
    assert_eq!(
        esrd.basis[0].reference.as_deref(),
        Some(format!("Observation/{}", bundle.observation.id).as_str())
    );

    let monthly = &bundle.risk[1];
    assert_eq!(monthly.id, ResourceId::derived("monthly-risk-score", MBI).as_str());
    let months: Vec<&str> = monthly.prediction.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        months,
        vec!["BENE_RSK_R_SCRE_01", "BENE_RSK_R_SCRE_02", "BENE_RSK_R_SCRE_10"]
    );

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnparseableDecimal);
    assert_eq!(result.diagnostics[0].key.as_deref(), Some("DEM_AGND_SCORE"));
}

#[test]
fn risk_score_text_is_written_unchanged() {
    let record = record()
        .with_field("HCC_version", "V24")
        .with_field("ESRD_SCORE", "1.10")
        .with_field("BENE_RSK_R_SCRE_01", "0.12345678901234567890");

    let bundle = synthesize_record(&record, &crosswalk(), v2()).bundle.unwrap();
    let json: Vec<String> = bundle
        .risk
        .into_iter()
        .map(|risk| serde_json::to_string(&Resource::RiskAssessment(risk)).unwrap())
        .collect();

    assert!(json[0].contains(r#""probabilityDecimal":1.10}"#), "{}", json[0]);
    assert!(
        json[1].contains(r#""probabilityDecimal":0.12345678901234567890}"#),
        "{}",
        json[1]
    );
}

#[test]
fn resource_ids_differ_per_beneficiary() {
    let first = record()
        .with_field("HCC_version", "V24")
        .with_field("ESRD_SCORE", "1.0");
    let second = AlrRecord::new("2S00E00AA00", first.timestamp)
        .with_field("HCC_version", "V24")
        .with_field("ESRD_SCORE", "1.0");

    let a = synthesize_record(&first, &crosswalk(), v2()).bundle.unwrap();
    let b = synthesize_record(&second, &crosswalk(), v2()).bundle.unwrap();

    assert_ne!(a.observation.id, b.observation.id);
    assert_ne!(a.risk[0].id, b.risk[0].id);
    assert_ne!(a.risk[1].id, b.risk[1].id);
    assert_ne!(a.episode.unwrap().id, b.episode.unwrap().id);
    assert!(!a.observation.id.contains(MBI));
}

#[test]
fn covid_episode_fields() {
    let record = record()
        .with_field("HCC_version", "V24")
        .with_field("ADMISSION_DT", "2020-04-01T00:00:00.000-05:00")
        .with_field("DISCHARGE_DT", "04/20/2020")
        .with_field("COVID19_MONTH03", "1")
        .with_field("COVID19_EPISODE", "2")
        .with_field("U071", "1")
        .with_field("B9729", "0");

    let result = synthesize_record(&record, &crosswalk(), v2());
    let episode = result.bundle.unwrap().episode.unwrap();

    assert_eq!(episode.period.start, NaiveDate::from_ymd_opt(2020, 4, 1));
    assert_eq!(episode.period.end, None);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnparseableDate);

    let flag = find(&episode.extension, COVID_FLAG_URL).expect("covid flag");
    assert_eq!(flag.extension[0].value, Some(ExtensionValue::Integer(1)));
    assert_eq!(flag.extension[1].url, "monthNum");
    assert_eq!(flag.extension[1].value, Some(ExtensionValue::Integer(3)));
    assert_eq!(
        find(&episode.extension, COVID_EPISODE_URL).and_then(|e| e.value.clone()),
        Some(ExtensionValue::Integer(2))
    );

    assert_eq!(episode.diagnosis.len(), 1);
    let identifier = episode.diagnosis[0].condition.identifier.as_ref().unwrap();
    assert_eq!(identifier.value.as_deref(), Some("U071"));
}

#[test]
fn patient_demographics_and_service_counts() {
    let mut record = record()
        .with_field("HCC_version", "V24")
        .with_field("MASTER_ID", "123456789")
        .with_field("B_EM_LINE_CNT_T", "4")
        .with_field("PCS_COUNT", "7")
        .with_field("NPI_USED", "1234567890")
        .with_field("REV_LINE_CNT", "x")
        .with_field("GEO_SSA_STATE_NAME", "MD");
    record.first_name = "Jane".to_string();
    record.last_name = "Doe".to_string();
    record.sex = "2".to_string();
    record.birth_date = NaiveDate::from_ymd_opt(1950, 1, 2);

    let result = synthesize_record(&record, &crosswalk(), v2());
    let patient = result.bundle.unwrap().patient;
    assert_eq!(patient.id, MBI);
    assert_eq!(patient.name[0].family.as_deref(), Some("Doe"));
    assert_eq!(patient.address[0].state.as_deref(), Some("MD"));
    assert_eq!(patient.extension.len(), 2);
    // TIN-NPI count: TAX participant, NPI participant, count.
    let tin_npi = &patient.extension[1];
    assert_eq!(tin_npi.extension.len(), 3);
    assert_eq!(tin_npi.extension[2].value, Some(ExtensionValue::Integer(7)));
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].key.as_deref(), Some("REV_LINE_CNT"));

    let json = serde_json::to_value(&patient).unwrap();
    assert_eq!(json["gender"], "female");
    assert_eq!(json["birthDate"], "1950-01-02");
}

#[test]
fn coverage_json_shape() {
    let record = record()
        .with_field("HCC_version", "V24")
        .with_field("EnrollFlag1", "1");
    let coverage = synthesize_record(&record, &crosswalk(), v1())
        .bundle
        .unwrap()
        .coverage;

    insta::assert_json_snapshot!(coverage, @r#"
    {
      "id": "1S00E00AA00",
      "meta": {
        "lastUpdated": "2021-03-01T00:00:00Z",
        "profile": [
          "http://alr.cms.gov/ig/StructureDefinition/alr-Coverage"
        ]
      },
      "extension": [
        {
          "extension": [
            {
              "url": "EnrollFlag1",
              "valueString": "1"
            }
          ],
          "url": "http://alr.cms.gov/ig/StructureDefinition/ext-enrollmentFlag"
        }
      ],
      "beneficiary": {
        "reference": "Patient/1S00E00AA00"
      }
    }
    "#);
}
