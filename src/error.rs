//! Error type shared by every operation

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required identifier or term is missing or out of range.
    /// Raised before any request is issued.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Upstream JSON/XML did not have the expected shape.
    #[error("upstream response failed validation: {0}")]
    Validation(String),

    /// The lookup succeeded but matched nothing, or the ratings page was empty.
    #[error("app not found")]
    NotFound,

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}
