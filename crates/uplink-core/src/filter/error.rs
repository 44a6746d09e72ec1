//! Reasons a candidate link was not rewritten. Never surfaced to callers.

use thiserror::Error;

use crate::oracle::OracleError;

#[derive(Debug, Error)]
pub enum FilterError {
    /// The attribute value does not parse as a URI reference.
    #[error("malformed URI {0:?}")]
    MalformedUri(String),
    /// Neither a project nor a group could be resolved for the document.
    #[error("no project or group in context")]
    MissingContext,
    /// The existence check failed and the policy requires a confirmed upload.
    #[error("existence check for {path} failed: {source}")]
    OracleUnavailable {
        path: String,
        #[source]
        source: OracleError,
    },
}
