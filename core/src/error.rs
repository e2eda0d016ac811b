//! Error types for the board API client.
//!
//! # Design
//! Three layers can fail: option validation (local, before any request),
//! the transport (network, credentials, HTTP status), and JSON decoding.
//! `ApiError` wraps all three so navigator operations return a single error
//! type; the inner errors are passed through unchanged.

use thiserror::Error;

/// Shorthand for navigator results.
pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Errors returned by every resource navigation and mutation operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Write options were rejected before any request was made.
    #[error("invalid options: {0}")]
    Validation(#[from] ValidationError),

    /// The transport failed or the server returned a non-success status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body did not match the expected resource shape.
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures raised by a `Transport`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server returned 401; the key or token was rejected.
    #[error("unauthorized: {body}")]
    Unauthorized { body: String },

    /// The server returned 404 for the requested path.
    #[error("resource not found: {path}")]
    NotFound { path: String },

    /// The server returned a non-2xx status other than 401/404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (connect, TLS, read failures).
    #[error("transport I/O failed: {0}")]
    Io(String),

    /// The resource was not produced by a session and cannot navigate.
    #[error("resource is not attached to a session")]
    Detached,
}

/// Rule violations reported by `AddCardOpts::validate`.
///
/// Only the first violated rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be a string of length from 1 to 16384")]
    Name,

    #[error("description may not be longer than 16384 characters")]
    Description,

    #[error("position, if present, has to be 'top' or 'bottom' (got {0:?})")]
    Position(String),

    #[error("list id is required and must be a 24-character hex string")]
    ListId,
}

/// Errors loading a `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
}
