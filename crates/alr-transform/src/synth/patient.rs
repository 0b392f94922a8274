//! Patient: demographics, identifiers, address and service counts.

use alr_model::{
    Address, Coding, Extension, Gender, HumanName, Identifier, Patient, ResourceKind,
};
use tracing::debug;

use crate::context::SynthesisContext;
use crate::profile::PATIENT_PROFILE;

pub const MBI_SYSTEM: &str = "http://hl7.org/fhir/sid/us-mbi";
pub const HICN_SYSTEM: &str = "http://hl7.org/fhir/sid/us-hicn";
pub const TIN_SYSTEM: &str = "http://hl7.org/fhir/sid/us-tin";
pub const NPI_SYSTEM: &str = "http://hl7.org/fhir/sid/us-npi";
pub const FIPS_COUNTY_URL: &str = "https://hl7.org/fhir/STU3/valueset-fips-county.html";

const IDENTIFIER_TYPE_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v2-0203";
const CCN_SYSTEM: &str = "https://bluebutton.cms.gov/resources/variables/prvdr_num";

const SERVICE_COUNT_TIN_URL: &str = "http://alr.cms.gov/ig/StructureDefinition/ext-serviceCountTIN";
const SERVICE_COUNT_CCN_URL: &str = "http://alr.cms.gov/ig/StructureDefinition/ext-serviceCountCCN";
const SERVICE_COUNT_TIN_NPI_URL: &str =
    "http://alr.cms.gov/ig/StructureDefinition/ext-serviceCountTINNPI";

const MASTER_ID: &str = "MASTER_ID";
const NPI_USED: &str = "NPI_USED";

/// A participant identifier type within a service-count extension.
struct Participant {
    system: &'static str,
    code: &'static str,
    display: &'static str,
}

const TAX_ID: Participant = Participant {
    system: IDENTIFIER_TYPE_SYSTEM,
    code: "TAX",
    display: "TAX ID Number",
};

const CCN: Participant = Participant {
    system: CCN_SYSTEM,
    code: "CCN",
    display: "CCN number",
};

const NPI: Participant = Participant {
    system: NPI_SYSTEM,
    code: "NPI",
    display: "NPI Number",
};

/// One of the three service-count extensions.
struct ServiceCount {
    count_key: &'static str,
    url: &'static str,
    participant: Participant,
    with_npi: bool,
}

const SERVICE_COUNTS: [ServiceCount; 3] = [
    ServiceCount {
        count_key: "B_EM_LINE_CNT_T",
        url: SERVICE_COUNT_TIN_URL,
        participant: TAX_ID,
        with_npi: false,
    },
    ServiceCount {
        count_key: "REV_LINE_CNT",
        url: SERVICE_COUNT_CCN_URL,
        participant: CCN,
        with_npi: false,
    },
    ServiceCount {
        count_key: "PCS_COUNT",
        url: SERVICE_COUNT_TIN_NPI_URL,
        participant: TAX_ID,
        with_npi: true,
    },
];

pub fn patient(ctx: &mut SynthesisContext<'_>) -> Patient {
    let record = ctx.record;
    Patient {
        id: record.mbi.clone(),
        meta: ctx.meta(ResourceKind::Patient, PATIENT_PROFILE),
        extension: service_counts(ctx),
        identifier: identifiers(ctx),
        name: name(&record.first_name, &record.last_name),
        gender: Gender::from_sex_code(&record.sex),
        birth_date: record.birth_date,
        deceased_date_time: record.death_date,
        address: address(ctx).into_iter().collect(),
    }
}

fn name(first: &str, last: &str) -> Vec<HumanName> {
    let name = HumanName {
        family: non_empty(last),
        given: non_empty(first).into_iter().collect(),
    };
    if name.family.is_none() && name.given.is_empty() {
        return Vec::new();
    }
    vec![name]
}

fn identifiers(ctx: &SynthesisContext<'_>) -> Vec<Identifier> {
    let record = ctx.record;
    let mut ids = vec![Identifier::new(MBI_SYSTEM, &record.mbi)];
    if let Some(hicn) = record.hicn.as_deref().filter(|v| !v.is_empty()) {
        ids.push(Identifier::new(HICN_SYSTEM, hicn));
    }
    if let Some(tin) = record.field("VA_TIN") {
        ids.push(Identifier::new(TIN_SYSTEM, tin));
    }
    if let Some(npi) = record.field("VA_NPI") {
        ids.push(Identifier::new(NPI_SYSTEM, npi));
    }
    ids
}

fn address(ctx: &SynthesisContext<'_>) -> Option<Address> {
    let record = ctx.record;
    let address = Address {
        extension: record
            .field("STATE_COUNTY_CD")
            .map(|code| Extension::string(FIPS_COUNTY_URL, code))
            .into_iter()
            .collect(),
        district: record.field("GEO_SSA_CNTY_CD_NAME").map(str::to_string),
        state: record.field("GEO_SSA_STATE_NAME").map(str::to_string),
    };
    (!address.is_empty()).then_some(address)
}

fn service_counts(ctx: &mut SynthesisContext<'_>) -> Vec<Extension> {
    let record = ctx.record;
    let master = record.field(MASTER_ID);
    let mut extensions = Vec::new();
    for service in &SERVICE_COUNTS {
        let Some(raw) = record.field(service.count_key) else {
            continue;
        };
        let Some(master) = master else {
            debug!(key = service.count_key, "service count without MASTER_ID, skipping");
            continue;
        };
        let Some(count) = ctx.parse_int(service.count_key, raw) else {
            continue;
        };

        let mut parts = vec![participant(&service.participant, master)];
        if service.with_npi
            && let Some(npi) = record.field(NPI_USED)
        {
            parts.push(participant(&NPI, npi));
        }
        parts.push(Extension::integer("serviceCount", count));
        extensions.push(Extension::nested(service.url, parts));
    }
    extensions
}

fn participant(kind: &Participant, value: &str) -> Extension {
    Extension::identifier(
        "participant",
        Identifier::typed(Coding::new(kind.system, kind.code, kind.display), value),
    )
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
