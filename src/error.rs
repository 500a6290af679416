//! Error types for the logs API.

/// Errors produced by the validator, query engine and store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client input violated a field constraint. The message is
    /// human-readable and safe to return to the client.
    #[error("{0}")]
    Validation(String),

    /// The requested log record does not exist.
    #[error("Log not found")]
    NotFound,

    /// The storage collaborator failed. The detail is logged server-side;
    /// clients receive a generic message.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl Error {
    /// Shorthand for a validation failure with the given client message.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
