use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("invalid query parameters: {0}")]
    InvalidQuery(String),

    #[error("history repository error: {0}")]
    RepositoryError(String),

    #[error("failed to serialize event payload: {0}")]
    SerializationError(String),
}
