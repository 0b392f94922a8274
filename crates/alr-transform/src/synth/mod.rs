//! One synthesizer per FHIR resource kind.
//!
//! Each takes the record's [`SynthesisContext`](crate::SynthesisContext) and
//! returns a resource; field-level problems land in the context's
//! diagnostics.

pub mod coverage;
pub mod episode;
pub mod group;
pub mod observation;
pub mod patient;
pub mod risk;

pub use coverage::coverage;
pub use episode::episode;
pub use group::{batch_group, flag_value, member, record_group};
pub use observation::observation;
pub use patient::patient;
pub use risk::risk_assessments;
