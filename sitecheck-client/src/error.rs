//! Errors returned by the inspection store and upload clients

use thiserror::Error;

/// Store client error
///
/// Status-mapped variants carry the message from the store's
/// `{ "msg": ... }` error body when one was present.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never completed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store answered success but the body was not the expected shape
    #[error("Invalid store response: {0}")]
    InvalidResponse(String),

    /// Bearer token missing or expired
    #[error("Authentication required")]
    Unauthorized,

    /// Record or photo belongs to another account
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Inspection or photo id unknown to the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store rejected the submitted fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Anything else the store reports
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
