use thiserror::Error;

/// The client's error type.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A transport-level HTTP failure (connect, timeout, body read).
    #[error("Transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-2xx API response. `message` is taken from the body's
    /// `error` field when the backend provides one.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// An I/O error from the credential file.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// A (de)serialization error from the credential file.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation requires an authenticated session.
    #[error("Not authenticated")]
    NotAuthenticated,
}

impl ClientError {
    /// The HTTP status of an API rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the request as unauthenticated,
    /// e.g. because a persisted token turned out to be revoked.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }
}

/// A `Result` type that uses `ClientError` as the error type.
pub type Result<T> = std::result::Result<T, ClientError>;
