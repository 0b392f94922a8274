use alr_model::{Coverage, Extension, Reference, ResourceKind};

use crate::context::SynthesisContext;
use crate::profile::COVERAGE_PROFILE;

pub const ENROLLMENT_FLAG_URL: &str = "http://alr.cms.gov/ig/StructureDefinition/ext-enrollmentFlag";

/// Coverage with one enrollment-flag extension per non-empty `EnrollFlagN`.
pub fn coverage(ctx: &mut SynthesisContext<'_>) -> Coverage {
    let buckets = ctx.buckets;
    let mut extension = Vec::new();
    for pair in &buckets.enrollment {
        if pair.is_empty() {
            ctx.skip_empty(&pair.key);
            continue;
        }
        extension.push(Extension::nested(
            ENROLLMENT_FLAG_URL,
            vec![Extension::string(&pair.key, &pair.value)],
        ));
    }

    Coverage {
        id: ctx.mbi().to_string(),
        meta: ctx.meta(ResourceKind::Coverage, COVERAGE_PROFILE),
        extension,
        beneficiary: Reference::to("Patient", ctx.mbi()),
    }
}
