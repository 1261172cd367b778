//! Error types for the registered notices client.
//!
//! # Design
//! Input that fails local validation never reaches the network and lands in
//! `ValidationError`. Everything that goes wrong after a request is built is
//! an `ApiError`: non-2xx responses keep the raw status and body, while
//! network failures carry no status at all.

use thiserror::Error;

/// Input rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid business ID: {0}")]
    InvalidBusinessId(String),

    /// `value` is not one of the codes of the named enumeration.
    #[error("invalid {enumeration}: {value}")]
    InvalidCode {
        enumeration: &'static str,
        value: String,
    },

    #[error("record number must not be empty")]
    EmptyRecordNumber,
}

/// Errors returned by `HttpClient` and the endpoint wrappers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A caller passed a structurally unusable argument.
    #[error("{0}")]
    InvalidArgument(String),

    /// The server answered with a status outside the 2xx range.
    #[error("HTTP error! status: {status}, body: {body}")]
    Http { status: u16, body: String },

    /// DNS, connect, timeout or I/O failure below HTTP.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
