//! Error types for the medication client core.
//!
//! # Design
//! Two families matter to the controllers: `ValidationError` never reaches
//! the network, and `ApiError` covers everything that went wrong once a
//! request was attempted. The remote contract gives status codes no
//! business meaning, so there is no `NotFound` or similar refinement; every
//! non-2xx response lands in `HttpError` with the raw status and body kept
//! for logs only.

use std::time::Duration;

use thiserror::Error;

use crate::form::Field;

/// Errors produced while building, executing or parsing an API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (DNS, connect, TLS, reset...).
    #[error("transport failed: {0}")]
    TransportError(String),

    /// No response arrived within the configured bound.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// A draft failed client-side validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "required fields are empty: {}",
        .0.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
    )]
    MissingFields(Vec<Field>),
}

/// Outcome of a controller operation that did not succeed.
///
/// Every variant has already been reported to the user through the
/// controller's `Notifier` (except `Busy`, which is silent) by the time it
/// is returned; callers may ignore it.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("request failed: {0}")]
    Network(#[from] ApiError),

    /// The same kind of operation is already in flight.
    #[error("{0} already in progress")]
    Busy(&'static str),

    #[error("no deletion is awaiting confirmation")]
    NothingPending,

    #[error("the form is not open")]
    FormClosed,
}

/// Errors raised while reading client configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
