//! Error types for the `acl-search` crate.

use thiserror::Error;

/// Errors that can occur while running an access-controlled search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The caller's user identifier has no entry in the access policy.
    #[error("Unknown user: no access policy entry for '{user_id}'")]
    UnknownUser {
        /// The user identifier that failed the policy lookup.
        user_id: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the document store backend.
    #[error("Document store error ({backend}): {message}")]
    Store {
        /// The document store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
