use crate::document::FieldError;
use thiserror::Error;

/// Failure to read from (or write to) the content store.
///
/// A query that matches nothing is not an error; lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("could not decode store response: {0}")]
    Decode(String),

    #[error("malformed document {collection}/{id}: {source}")]
    Malformed {
        collection: String,
        id: String,
        #[source]
        source: FieldError,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
