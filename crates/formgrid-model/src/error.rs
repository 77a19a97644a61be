use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid column key: {0:?}")]
    InvalidColumnKey(String),
    #[error("invalid table name: {0:?}")]
    InvalidTableName(String),
    #[error("select field requires at least one option")]
    EmptySelectOptions,
}

pub type Result<T> = std::result::Result<T, ModelError>;
