//! Upload path modeling: classify link values and escape upload paths.
//!
//! A value is only ever rewritten when it is a relative, well-formed path
//! rooted at `/uploads/`. Everything else (absolute URLs, repository-relative
//! links, unparsable junk) is left exactly as written.

mod classify;
mod escape;

pub use classify::{classify, UploadReference};
pub use escape::escape_path;

/// Leading segment that marks a stored upload.
pub const UPLOADS_PREFIX: &str = "/uploads/";
