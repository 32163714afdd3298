//! Error types for typesense-core

/// Result type for typesense-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling resources
///
/// Not-found from the remote side is deliberately absent: Read and Delete
/// recover it locally (drift), so it never escapes as an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credentials still missing after explicit configuration and
    /// environment fallback
    #[error("missing credentials: {}", fields.join(", "))]
    MissingCredentials { fields: Vec<String> },

    /// Identifier that does not split into `<collection>.<name>`
    #[error("invalid identifier {id:?}: expected <collection>.<name>")]
    MalformedIdentifier { id: String },

    /// Identifier component that is empty or contains the separator
    #[error("invalid identifier component {part:?}: must be non-empty and must not contain '.'")]
    InvalidIdentifierPart { part: String },

    /// Synonym mapping with no entries
    #[error("synonym {name:?} must define at least one synonym")]
    EmptySynonyms { name: String },

    /// Document body carrying the reserved identity key
    #[error("document {name:?} must not define the reserved key \"id\"")]
    ReservedDocumentKey { name: String },

    /// Hard failure from the remote API
    #[error("unable to {operation} {kind}: {source}")]
    Remote {
        operation: &'static str,
        kind: &'static str,
        #[source]
        source: typesense_client::Error,
    },

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an adapter failure with the attempted operation and resource kind.
    pub fn remote(
        operation: &'static str,
        kind: &'static str,
        source: typesense_client::Error,
    ) -> Self {
        Error::Remote {
            operation,
            kind,
            source,
        }
    }
}
