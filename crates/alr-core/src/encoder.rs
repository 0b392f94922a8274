//! Resource serialization.

use alr_model::Resource;

use crate::error::{CoreError, Result};

/// Turns one resource into its wire text.
///
/// Encoders run on the rayon pool, so they must be shareable across threads.
pub trait ResourceEncoder: Send + Sync {
    fn encode(&self, resource: &Resource) -> Result<String>;
}

/// Compact single-line JSON, one resource per line when written as NDJSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl ResourceEncoder for JsonEncoder {
    fn encode(&self, resource: &Resource) -> Result<String> {
        serde_json::to_string(resource).map_err(|source| CoreError::encode(resource, source))
    }
}
