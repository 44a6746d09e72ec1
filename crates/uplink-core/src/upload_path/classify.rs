//! Classify attribute values as absolute, upload path, or ordinary relative.

use percent_encoding::percent_decode_str;
use url::{ParseError, Url};

use super::UPLOADS_PREFIX;

/// Base used only to check that relative values are syntactically valid.
const PROBE_BASE: &str = "http://uplink.invalid/";

/// Classification of one attribute value. Cheap to build, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReference {
    pub raw_value: String,
    /// Parses as a URI with a non-empty scheme.
    pub is_absolute: bool,
    /// Parses at all (absolute or relative).
    pub is_well_formed: bool,
    /// Relative, well-formed, and rooted at `/uploads/`.
    pub is_upload_path: bool,
    /// Path part without the leading `/` (e.g. `uploads/<secret>/a.png`).
    /// Set only when `is_upload_path`.
    pub upload_path: Option<String>,
    /// `?query` and/or `#fragment` suffix, kept verbatim.
    pub suffix: String,
}

impl UploadReference {
    /// True when the value must be left untouched.
    pub fn is_ordinary(&self) -> bool {
        !self.is_upload_path
    }
}

/// Classifies `value`. Never panics; anything unparsable is treated as an
/// ordinary relative value (left unchanged).
pub fn classify(value: &str) -> UploadReference {
    let mut reference = UploadReference {
        raw_value: value.to_string(),
        is_absolute: false,
        is_well_formed: false,
        is_upload_path: false,
        upload_path: None,
        suffix: String::new(),
    };

    if !is_clean(value) {
        tracing::trace!(value, "value has stray whitespace, control chars or bad escapes");
        return reference;
    }

    match Url::parse(value) {
        Ok(_) => {
            reference.is_absolute = true;
            reference.is_well_formed = true;
            return reference;
        }
        Err(ParseError::RelativeUrlWithoutBase) => {}
        Err(e) => {
            tracing::trace!(value, "scheme-like value failed to parse: {}", e);
            return reference;
        }
    }

    let well_formed = Url::parse(PROBE_BASE)
        .and_then(|base| base.join(value))
        .is_ok();
    if !well_formed {
        return reference;
    }
    reference.is_well_formed = true;

    let (path, suffix) = split_suffix(value);
    if let Some(upload_path) = upload_path_of(path) {
        reference.is_upload_path = true;
        reference.upload_path = Some(upload_path.to_string());
        reference.suffix = suffix.to_string();
    }
    reference
}

/// No surrounding whitespace, no ASCII control characters, and every `%`
/// starts a valid `%XX` sequence. The `url` parser silently repairs all of
/// these, so they are checked on the raw value.
fn is_clean(value: &str) -> bool {
    if value.trim() != value || value.chars().any(|c| c.is_ascii_control()) {
        return false;
    }
    let b = value.as_bytes();
    b.iter().enumerate().all(|(i, &c)| {
        c != b'%'
            || (i + 2 < b.len() && b[i + 1].is_ascii_hexdigit() && b[i + 2].is_ascii_hexdigit())
    })
}

/// Splits `path?query#fragment` into the path and the rest.
fn split_suffix(value: &str) -> (&str, &str) {
    match value.find(['?', '#']) {
        Some(i) => value.split_at(i),
        None => (value, ""),
    }
}

/// Returns `uploads/...` when `path` is `/uploads/` followed by one or more
/// non-empty segments. Segments are judged after percent-decoding: none may
/// be `.` or `..`, or contain a path separator.
fn upload_path_of(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(UPLOADS_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    let segments_ok = rest.split('/').all(|s| {
        let decoded = percent_decode_str(s).decode_utf8_lossy();
        !decoded.is_empty()
            && decoded != "."
            && decoded != ".."
            && !decoded.contains(['/', '\\'])
    });
    if !segments_ok {
        return None;
    }
    Some(&path[1..])
}
