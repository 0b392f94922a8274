//! Builds FHIR resources from classified ALR records.
//!
//! [`synthesize_record`] runs classification and every synthesizer for one
//! record under a [`SchemaProfile`]. The batch-level Group of schema v2 is
//! built separately with [`synth::batch_group`] once all members are known.

#![deny(unsafe_code)]

pub mod bundle;
pub mod context;
pub mod datetime;
pub mod profile;
pub mod synth;

pub use bundle::{RecordSynthesis, ResourceBundle, synthesize_record};
pub use context::SynthesisContext;
pub use profile::{GroupScope, SchemaProfile};
