//! Error taxonomy for daybook operations.
//!
//! Every fallible operation in the crate resolves to one of these variants.
//! Errors are handled at the operation boundary and never crash the process;
//! persistence failures additionally trigger a rollback of the optimistic
//! in-memory state (see `controller`).

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad input rejected before any state was touched: empty text,
    /// non-positive amount, quantity or price.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A durable store operation failed.
    #[error("persistence failure in '{namespace}': {message}")]
    Persistence {
        namespace: &'static str,
        message: String,
    },

    /// An insert was issued for an id the store already holds.
    #[error("duplicate id '{id}' in '{namespace}'")]
    DuplicateId {
        namespace: &'static str,
        id: String,
    },

    /// No entity with the given id in the collection.
    #[error("no entity with id '{0}'")]
    NotFound(String),

    /// The text-generation collaborator failed or returned a malformed
    /// response. Logged and abandoned, never surfaced to the user.
    #[error("breakdown failed: {0}")]
    Enrichment(String),

    /// Configuration and filesystem plumbing outside the store boundary.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn persistence(namespace: &'static str, message: impl Into<String>) -> Self {
        Error::Persistence {
            namespace,
            message: message.into(),
        }
    }

    pub fn enrichment(message: impl Into<String>) -> Self {
        Error::Enrichment(message.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Enrichment(e.to_string())
    }
}
