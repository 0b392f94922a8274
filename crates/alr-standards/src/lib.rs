#![deny(unsafe_code)]

pub mod crosswalk;
pub mod error;
pub mod paths;

pub use crate::crosswalk::{CrosswalkTable, HccEntry};
pub use crate::error::StandardsError;
pub use crate::paths::{CROSSWALK_ENV_VAR, CrosswalkSource, DEFAULT_CANDIDATES};
