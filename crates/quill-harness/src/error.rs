use quill_core::{DomainError, RepoError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// A batch stopped at its first failing creation.
    #[error("test data creation failed after {succeeded} post(s): {source}")]
    CreationFailed {
        succeeded: usize,
        #[source]
        source: RepoError,
    },

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("content store error: {0}")]
    Repo(#[from] RepoError),
}
