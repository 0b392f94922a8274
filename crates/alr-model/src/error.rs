use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown schema version: {0} (expected v1, stu3, v2 or r4)")]
    UnknownSchemaVersion(String),
    #[error("not a finite decimal: {0:?}")]
    InvalidDecimal(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
