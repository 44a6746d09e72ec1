//! Policy and oracle-usage tests for the upload link filter.

use super::*;
use crate::document::{Document, Element};
use crate::oracle::{OracleError, StaticOracle};
use std::sync::Mutex;

const UPLOAD: &str = "/uploads/e90decf88d8f96fe9e1389afc2e4a91f/test.jpg";

/// Records every call and answers from a fixed table.
#[derive(Default)]
struct RecordingOracle {
    calls: Mutex<Vec<(&'static str, String)>>,
    exists: bool,
    image: bool,
}

impl RecordingOracle {
    fn answering(exists: bool, image: bool) -> Arc<Self> {
        Arc::new(Self {
            exists,
            image,
            ..Default::default()
        })
    }

    fn calls(&self) -> Vec<(&'static str, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExistenceOracle for RecordingOracle {
    fn exists(&self, path: &str) -> Result<bool, OracleError> {
        self.calls.lock().unwrap().push(("exists", path.to_string()));
        Ok(self.exists)
    }

    fn is_image(&self, path: &str) -> Result<bool, OracleError> {
        self.calls.lock().unwrap().push(("is_image", path.to_string()));
        Ok(self.image)
    }
}

fn filter_with(oracle: Arc<dyn ExistenceOracle>) -> UploadLinkFilter {
    UploadLinkFilter::new("http://host", oracle).unwrap()
}

fn link_and_image() -> Document {
    Document::new(vec![
        Element::new("a").with_attr("href", UPLOAD).with_text("x").into(),
        Element::new("img").with_attr("src", UPLOAD).into(),
    ])
}

#[test]
fn base_url_is_normalized() {
    let oracle: Arc<dyn ExistenceOracle> = Arc::new(StaticOracle::assume_present());
    let f = UploadLinkFilter::new("http://host/", oracle.clone()).unwrap();
    assert_eq!(f.base_url(), "http://host");
    let f = UploadLinkFilter::new("https://host/gitlab/", oracle).unwrap();
    assert_eq!(f.base_url(), "https://host/gitlab");
}

#[test]
fn invalid_base_urls_are_rejected() {
    let oracle: Arc<dyn ExistenceOracle> = Arc::new(StaticOracle::assume_present());
    let bad_urls = [
        "",
        "host",
        "/relative",
        "mailto:me@example.com",
        "http://host/?q=1",
        "http://host/#f",
    ];
    for bad in bad_urls {
        assert!(UploadLinkFilter::new(bad, oracle.clone()).is_err(), "{bad}");
    }
}

#[test]
fn oracle_called_once_per_candidate_with_kind_by_tag() {
    let oracle = RecordingOracle::answering(true, true);
    let filter = filter_with(oracle.clone());
    let mut doc = link_and_image();
    doc.nodes.push(Element::new("a").with_attr("href", "README.md").into());

    let stats = filter.rewrite(&mut doc, &FilterContext::for_project("group/proj"));

    let expected_path = "group/proj/uploads/e90decf88d8f96fe9e1389afc2e4a91f/test.jpg";
    assert_eq!(
        oracle.calls(),
        vec![
            ("exists", expected_path.to_string()),
            ("is_image", expected_path.to_string()),
        ]
    );
    assert_eq!(
        stats,
        RewriteStats {
            candidates: 2,
            rewritten: 2,
            unconfirmed: 0,
            missing_context: false,
        }
    );
}

#[test]
fn oracle_receives_decoded_path() {
    let oracle = RecordingOracle::answering(true, true);
    let filter = filter_with(oracle.clone());
    let doc = Document::from_element(
        Element::new("img").with_attr("src", "/uploads/%ED%95%9C%EA%B8%80.png"),
    );
    filter.call(doc, &FilterContext::for_group("g"));
    assert_eq!(
        oracle.calls(),
        vec![("is_image", "groups/g/-/uploads/한글.png".to_string())]
    );
}

#[test]
fn rewrite_anyway_when_upload_missing() {
    let filter = filter_with(Arc::new(StaticOracle::new(false, false)));
    let mut doc = link_and_image();
    let stats = filter.rewrite(&mut doc, &FilterContext::for_project("group/proj"));
    assert_eq!(stats.rewritten, 2);
    assert_eq!(stats.unconfirmed, 2);
    assert_eq!(
        doc.find_first("img").and_then(|e| e.attr("src")),
        Some("http://host/group/proj/uploads/e90decf88d8f96fe9e1389afc2e4a91f/test.jpg")
    );
}

#[test]
fn rewrite_anyway_when_oracle_unavailable() {
    let filter = filter_with(Arc::new(StaticOracle::unavailable()));
    let mut doc = link_and_image();
    let stats = filter.rewrite(&mut doc, &FilterContext::for_project("group/proj"));
    assert_eq!(stats.rewritten, 2);
    assert_eq!(stats.unconfirmed, 2);
}

#[test]
fn require_existing_keeps_missing_uploads() {
    let filter = filter_with(Arc::new(StaticOracle::new(false, false)))
        .with_policy(ExistencePolicy::RequireExisting);
    let mut doc = link_and_image();
    let before = doc.to_html();
    let stats = filter.rewrite(&mut doc, &FilterContext::for_project("group/proj"));
    assert_eq!(doc.to_html(), before);
    assert_eq!(stats.candidates, 2);
    assert_eq!(stats.rewritten, 0);
}

#[test]
fn require_existing_keeps_link_when_oracle_fails() {
    let filter = filter_with(Arc::new(StaticOracle::unavailable()))
        .with_policy(ExistencePolicy::RequireExisting);
    let mut doc = link_and_image();
    let before = doc.to_html();
    let stats = filter.rewrite(&mut doc, &FilterContext::for_project("group/proj"));
    assert_eq!(doc.to_html(), before);
    assert_eq!(stats.rewritten, 0);
}

#[test]
fn require_existing_checks_images_as_images() {
    // The file exists but is not an image: the <img> stays, the <a> is rewritten.
    let filter = filter_with(Arc::new(StaticOracle::new(true, false)))
        .with_policy(ExistencePolicy::RequireExisting);
    let mut doc = link_and_image();
    filter.rewrite(&mut doc, &FilterContext::for_project("group/proj"));
    assert_eq!(
        doc.find_first("a").and_then(|e| e.attr("href")),
        Some("http://host/group/proj/uploads/e90decf88d8f96fe9e1389afc2e4a91f/test.jpg")
    );
    assert_eq!(doc.find_first("img").and_then(|e| e.attr("src")), Some(UPLOAD));
}

#[test]
fn missing_context_skips_oracle() {
    let oracle = RecordingOracle::answering(true, true);
    let filter = filter_with(oracle.clone());
    let mut doc = link_and_image();
    let stats = filter.rewrite(&mut doc, &FilterContext::default());
    assert!(stats.missing_context);
    assert_eq!(stats.rewritten, 0);
    assert!(oracle.calls().is_empty());
}

#[test]
fn query_and_fragment_survive() {
    let filter = filter_with(Arc::new(StaticOracle::assume_present()));
    let doc = Document::from_element(
        Element::new("a").with_attr("href", "/uploads/abc/a b.pdf?x=1#p2"),
    );
    let doc = filter.call(doc, &FilterContext::for_project("g/p"));
    assert_eq!(
        doc.find_first("a").and_then(|e| e.attr("href")),
        Some("http://host/g/p/uploads/abc/a%20b.pdf?x=1#p2")
    );
}

#[test]
fn other_tags_and_attributes_untouched() {
    let filter = filter_with(Arc::new(StaticOracle::assume_present()));
    let doc = Document::new(vec![
        Element::new("a").with_attr("title", UPLOAD).into(),
        Element::new("img").with_attr("data-src", UPLOAD).into(),
        Element::new("video").with_attr("src", UPLOAD).into(),
        Element::new("a").into(),
    ]);
    let before = doc.to_html();
    let doc = filter.call(doc, &FilterContext::for_project("g/p"));
    assert_eq!(doc.to_html(), before);
}

#[test]
fn uppercase_tags_and_attributes_are_handled() {
    let filter = filter_with(Arc::new(StaticOracle::assume_present()));
    let doc = Document::from_element(Element::new("IMG").with_attr("SRC", UPLOAD));
    let doc = filter.call(doc, &FilterContext::for_project("g/p"));
    assert_eq!(
        doc.find_first("img").and_then(|e| e.attr("src")),
        Some("http://host/g/p/uploads/e90decf88d8f96fe9e1389afc2e4a91f/test.jpg")
    );
}

#[test]
fn encoded_separator_segments_are_never_looked_up() {
    let oracle = RecordingOracle::answering(true, true);
    let filter = filter_with(oracle.clone());
    let doc = Document::from_element(Element::new("a").with_attr("href", "/uploads/a%2Fb/c.png"));
    let doc = filter.call(doc, &FilterContext::for_project("g/p"));
    assert_eq!(doc.find_first("a").and_then(|e| e.attr("href")), Some("/uploads/a%2Fb/c.png"));
    assert!(oracle.calls().is_empty());
}

#[test]
fn lookup_decodes_each_segment() {
    assert_eq!(decode_segments("uploads/a%20b/%ED%95%9C.png"), "uploads/a b/한.png");
    assert_eq!(decode_segments("uploads/x"), "uploads/x");
}
