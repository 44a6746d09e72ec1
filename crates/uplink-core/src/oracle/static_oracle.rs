//! Fixed-answer oracle for tests and for setups without upload storage.

use super::{ExistenceOracle, OracleError};

#[derive(Debug, Clone)]
pub struct StaticOracle {
    answer: Option<(bool, bool)>,
}

impl StaticOracle {
    /// Always answers `exists` and `is_image` with the given values.
    pub fn new(exists: bool, image: bool) -> Self {
        Self {
            answer: Some((exists, image)),
        }
    }

    /// Every upload exists and is an image.
    pub fn assume_present() -> Self {
        Self::new(true, true)
    }

    /// Every call fails with [`OracleError::Unavailable`].
    pub fn unavailable() -> Self {
        Self { answer: None }
    }
}

impl ExistenceOracle for StaticOracle {
    fn exists(&self, _path: &str) -> Result<bool, OracleError> {
        self.answer
            .map(|(exists, _)| exists)
            .ok_or_else(|| OracleError::Unavailable("static oracle has no answer".into()))
    }

    fn is_image(&self, _path: &str) -> Result<bool, OracleError> {
        self.answer
            .map(|(_, image)| image)
            .ok_or_else(|| OracleError::Unavailable("static oracle has no answer".into()))
    }
}
