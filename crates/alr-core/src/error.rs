use alr_model::Resource;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A resource could not be serialized. Aborts the whole batch.
    #[error("failed to encode {resource_type} {id}: {source}")]
    Encode {
        resource_type: &'static str,
        id: String,
        #[source]
        source: BoxError,
    },
}

impl CoreError {
    pub fn encode(resource: &Resource, source: impl Into<BoxError>) -> Self {
        Self::Encode {
            resource_type: resource.resource_type(),
            id: resource.id().to_string(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
