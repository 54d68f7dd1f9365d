//! Error types for the structural fragment patcher.
//!
//! Every patch operation returns a [`PatchResult`]. A container that cannot be
//! found or captured is an expected condition for a tool that works on
//! hand-edited files, so it is reported as a value instead of being swallowed.

use thiserror::Error;

/// Failure modes of the patch operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// The named object or union alias does not occur in the buffer.
    #[error("container '{name}' not found")]
    ContainerNotFound { name: String },

    /// The container header exists but its body cannot be captured by the
    /// one-level nesting pattern.
    #[error("container '{name}' is malformed: {reason}")]
    MalformedContainer { name: String, reason: String },

    /// The key to remove does not occur inside the container.
    #[error("entry '{key}' not found in container '{container}'")]
    EntryNotFound { container: String, key: String },

    /// The variant to remove is not part of the union.
    #[error("variant {variant} not found in union type '{type_name}'")]
    VariantNotFound { type_name: String, variant: String },

    /// A dynamic pattern failed to compile or ran out of backtracking budget.
    #[error("pattern error: {0}")]
    Pattern(String),
}

impl From<fancy_regex::Error> for PatchError {
    fn from(err: fancy_regex::Error) -> Self {
        PatchError::Pattern(err.to_string())
    }
}

pub type PatchResult<T> = Result<T, PatchError>;
