//! Batch-level ALR synthesis.
//!
//! A [`BatchOrchestrator`] owns the shared crosswalk and a schema version,
//! and turns a slice of records into ordered, encoded FHIR resources plus
//! the diagnostics collected along the way.

#![deny(unsafe_code)]

pub mod encoder;
pub mod error;
pub mod orchestrator;

pub use encoder::{JsonEncoder, ResourceEncoder};
pub use error::{CoreError, Result};
pub use orchestrator::{BatchContext, BatchOptions, BatchOrchestrator, BatchOutput, BatchSummary};
