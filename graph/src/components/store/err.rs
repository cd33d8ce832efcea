use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store error: {0:#}")]
    Unknown(anyhow::Error),
    #[error("unknown entity type `{0}`")]
    UnknownEntityType(String),
    #[error("entity type `{0}` does not have an attribute `{1}`")]
    UnknownAttribute(String, String),
    #[error("{0}")]
    EntityValidationError(String),
    #[error("query execution failed: {0}")]
    QueryExecutionError(String),
    #[error("failed to serialize or deserialize stored data: {0}")]
    Serialization(String),
    #[error("store lock was poisoned: {0}")]
    Poisoned(String),
}

impl From<anyhow::Error> for StoreError {
    fn from(e: anyhow::Error) -> Self {
        StoreError::Unknown(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned(e.to_string())
    }
}
