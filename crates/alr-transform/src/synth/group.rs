//! Group membership: assignment flags, change type and change reasons.
//!
//! The member entry is the same for both schema versions. V1 wraps each
//! member in its own Group; v2 collects every member of a batch into one.

use alr_map::{GroupField, reason_description};
use alr_model::{
    Coding, Extension, Group, GroupMember, Meta, Reference, ResourceId, ResourceKind,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::context::SynthesisContext;
use crate::datetime::instant;
use crate::profile::{GROUP_PROFILE, SchemaProfile};

pub const CHANGE_TYPE_URL: &str =
    "http://hl7.org/fhir/us/davinci-atr/STU1/StructureDefinition-ext-changeType.html";
pub const CHANGE_REASON_URL: &str = "http://alr.cms.gov/ig/StructureDefinition/ext-changeReason";
pub const CHANGE_REASON_SYSTEM: &str =
    "https://bluebutton.cms.gov/resources/variables/alr/changeReason/";
pub const CLAIMS_BASED_ASSIGNMENT_FLAG_URL: &str =
    "http://alr.cms.gov/ig/StructureDefinition/ext-claimsBasedAssignmentFlag";
pub const CLAIMS_BASED_ASSIGNMENT_STEP_URL: &str =
    "http://alr.cms.gov/ig/StructureDefinition/ext-claimsBasedAssignmentStep";
pub const NEWLY_ASSIGNED_URL: &str =
    "http://alr.cms.gov/ig/StructureDefinition/ext-newlyAssignedBeneficiaryFlag";
pub const PREVIOUSLY_ASSIGNED_URL: &str =
    "http://alr.cms.gov/ig/StructureDefinition/ext-prevAssignedBeneficiaryFlag";
pub const VOLUNTARY_ALIGNMENT_URL: &str =
    "http://alr.cms.gov/ig/StructureDefinition/ext-voluntaryAlignmentFlag";
pub const VA_SELECTION_ONLY_URL: &str =
    "http://alr.cms.gov/ig/StructureDefinition/ext-vaSelectionOnlyFlag";

/// `"0"` is false; any other value is true.
pub fn flag_value(value: &str) -> bool {
    value != "0"
}

/// Build the member entry for the record's beneficiary.
pub fn member(ctx: &mut SynthesisContext<'_>) -> GroupMember {
    let mut extension = Vec::new();
    let mut reasons = Vec::new();

    let buckets = ctx.buckets;
    for pair in &buckets.group {
        if pair.is_empty() {
            ctx.skip_empty(&pair.key);
            continue;
        }
        let Some(field) = GroupField::from_key(&pair.key) else {
            debug!(key = %pair.key, "group field has no member mapping");
            continue;
        };
        match field {
            GroupField::ChangeType => {
                let code = if pair.value == "1" { "dropped" } else { "nochange" };
                extension.push(Extension::code(CHANGE_TYPE_URL, code));
            }
            GroupField::ChangeReason(code) => {
                if !ctx.profile.reports_reason(code) {
                    debug!(key = code, version = %ctx.profile.version, "reason not reported by schema version");
                    continue;
                }
                if pair.value == "0" {
                    continue;
                }
                let display = reason_description(code).unwrap_or_default();
                reasons.push(Extension::coding(
                    "reasonCode",
                    Coding::new(CHANGE_REASON_SYSTEM, code, display),
                ));
            }
            GroupField::ClaimsBasedAssignmentStep => {
                if let Some(step) = ctx.parse_int(&pair.key, &pair.value) {
                    extension.push(Extension::integer(CLAIMS_BASED_ASSIGNMENT_STEP_URL, step));
                }
            }
            GroupField::ClaimsBasedAssignmentFlag => {
                extension.push(flag(CLAIMS_BASED_ASSIGNMENT_FLAG_URL, &pair.value));
            }
            GroupField::NewlyAssigned => {
                extension.push(flag(NEWLY_ASSIGNED_URL, &pair.value));
            }
            GroupField::PreviouslyAssigned => {
                extension.push(flag(PREVIOUSLY_ASSIGNED_URL, &pair.value));
            }
            GroupField::VoluntaryAlignment => {
                extension.push(flag(VOLUNTARY_ALIGNMENT_URL, &pair.value));
            }
            GroupField::VaSelectionOnly => {
                extension.push(flag(VA_SELECTION_ONLY_URL, &pair.value));
            }
        }
    }

    if !reasons.is_empty() {
        extension.push(Extension::nested(CHANGE_REASON_URL, reasons));
    }

    GroupMember {
        extension,
        entity: Reference::to("Patient", ctx.mbi()),
    }
}

fn flag(url: &str, value: &str) -> Extension {
    Extension::boolean(url, flag_value(value))
}

/// Per-record Group holding only this record's member (v1).
pub fn record_group(ctx: &SynthesisContext<'_>, member: GroupMember) -> Group {
    Group {
        id: ResourceId::derived("group", ctx.mbi()).into_string(),
        meta: ctx.meta(ResourceKind::Group, GROUP_PROFILE),
        kind: "person".to_string(),
        actual: true,
        member: vec![member],
    }
}

/// Batch Group holding one member per synthesized record (v2).
pub fn batch_group(
    profile: &SchemaProfile,
    batch_id: &str,
    timestamp: &DateTime<Utc>,
    members: Vec<GroupMember>,
) -> Group {
    let stamp = profile
        .stamps(ResourceKind::Group)
        .then(|| instant(timestamp));
    Group {
        id: batch_id.to_string(),
        meta: Meta::profile(GROUP_PROFILE).with_last_updated(stamp),
        kind: "person".to_string(),
        actual: true,
        member: members,
    }
}
