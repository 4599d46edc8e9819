use thiserror::Error;

/// Errors raised by upstream data sources
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;
