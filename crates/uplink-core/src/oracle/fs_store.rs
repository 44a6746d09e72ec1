//! Filesystem-backed oracle: uploads stored under a root directory by owner path.

use std::path::{Component, Path, PathBuf};

use super::{ExistenceOracle, OracleError};

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "tiff", "tif", "ico", "webp", "svg",
];

/// Looks uploads up as regular files below `root`.
#[derive(Debug, Clone)]
pub struct FsUploadStore {
    root: PathBuf,
}

impl FsUploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an owner-relative path to a file under the root. Only plain
    /// segments are accepted, so a link cannot probe outside the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, OracleError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut out = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => out.push(segment),
                Component::CurDir => {}
                _ => return Err(OracleError::InvalidPath(path.to_string())),
            }
        }
        if out == self.root {
            return Err(OracleError::InvalidPath(path.to_string()));
        }
        Ok(out)
    }
}

impl ExistenceOracle for FsUploadStore {
    fn exists(&self, path: &str) -> Result<bool, OracleError> {
        let file = self.resolve(path)?;
        match std::fs::metadata(&file) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(OracleError::Io(e)),
        }
    }

    fn is_image(&self, path: &str) -> Result<bool, OracleError> {
        Ok(is_image_path(path) && self.exists(path)?)
    }
}

/// True when the file extension names a browser-renderable image format.
pub fn is_image_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|i| i.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
