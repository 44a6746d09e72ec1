//! Percent-encoding of upload paths.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except RFC 3986 unreserved characters is encoded.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes every segment of `path`, keeping `/` as the separator.
///
/// Existing `%XX` sequences are copied through unchanged, so escaping an
/// already escaped path is a no-op. A `%` that does not start a valid
/// sequence is encoded as `%25`.
pub fn escape_path(path: &str) -> String {
    path.split('/')
        .map(escape_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(pos) = rest.find('%') {
        let (plain, tail) = rest.split_at(pos);
        out.extend(utf8_percent_encode(plain, SEGMENT));
        if is_percent_sequence(tail) {
            out.push_str(&tail[..3]);
            rest = &tail[3..];
        } else {
            out.push_str("%25");
            rest = &tail[1..];
        }
    }
    out.extend(utf8_percent_encode(rest, SEGMENT));
    out
}

/// `s` starts with `%` followed by two hex digits.
fn is_percent_sequence(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 3 && b[0] == b'%' && b[1].is_ascii_hexdigit() && b[2].is_ascii_hexdigit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_path_unchanged() {
        let p = "uploads/e90decf88d8f96fe9e1389afc2e4a91f/test.jpg";
        assert_eq!(escape_path(p), p);
    }

    #[test]
    fn unicode_filename() {
        assert_eq!(escape_path("uploads/한글.png"), "uploads/%ED%95%9C%EA%B8%80.png");
    }

    #[test]
    fn idempotent() {
        let once = escape_path("uploads/a b/한글 (1).png");
        assert_eq!(once, "uploads/a%20b/%ED%95%9C%EA%B8%80%20%281%29.png");
        assert_eq!(escape_path(&once), once);
    }

    #[test]
    fn lone_percent_is_encoded() {
        assert_eq!(escape_path("uploads/100%.txt"), "uploads/100%25.txt");
        assert_eq!(escape_path("uploads/%zz"), "uploads/%25zz");
        assert_eq!(escape_path("uploads/50%25.txt"), "uploads/50%25.txt");
    }

    #[test]
    fn separators_preserved() {
        assert_eq!(escape_path("a/b/c"), "a/b/c");
        assert_eq!(escape_path("/a/"), "/a/");
    }
}
