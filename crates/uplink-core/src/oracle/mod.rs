//! Existence oracle: "is this upload there, and is it an image?"
//!
//! The filter never looks at storage itself. It asks an injected
//! [`ExistenceOracle`]; production code plugs in [`FsUploadStore`] (optionally
//! bounded by [`TimeoutOracle`]) and tests plug in [`StaticOracle`].

mod fs_store;
mod static_oracle;
mod timeout;

pub use fs_store::{is_image_path, FsUploadStore};
pub use static_oracle::StaticOracle;
pub use timeout::TimeoutOracle;

use thiserror::Error;

/// Why an oracle could not answer. The filter treats every variant as "no".
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("storage lookup failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("lookup timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("path rejected: {0}")]
    InvalidPath(String),
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

/// Capability consulted by the filter before committing a rewrite.
///
/// `path` is owner-relative and percent-decoded, e.g.
/// `group/proj/uploads/<secret>/test.jpg` or
/// `groups/group1/-/uploads/<secret>/test.jpg`.
pub trait ExistenceOracle: Send + Sync {
    fn exists(&self, path: &str) -> Result<bool, OracleError>;
    fn is_image(&self, path: &str) -> Result<bool, OracleError>;
}

impl<T: ExistenceOracle + ?Sized> ExistenceOracle for std::sync::Arc<T> {
    fn exists(&self, path: &str) -> Result<bool, OracleError> {
        (**self).exists(path)
    }

    fn is_image(&self, path: &str) -> Result<bool, OracleError> {
        (**self).is_image(path)
    }
}
