//! Error types for typesense-client

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the Typesense admin API client
///
/// Not-found is a first-class variant rather than a substring of the error
/// text: callers that recover from missing resources match on
/// [`Error::is_not_found`] instead of parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server reported the resource as missing (HTTP 404)
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The server answered with a non-success status other than 404
    #[error("server returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// The HTTP status carried by this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            Error::Json(_) => None,
        }
    }
}
