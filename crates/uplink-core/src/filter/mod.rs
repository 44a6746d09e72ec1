//! Upload link filter: rewrite `/uploads/...` links into owner-scoped URLs.
//!
//! For every `<a href>` and `<img src>` at any depth, the value is classified;
//! upload paths get `<base url>/<owner segment>/` prepended and are escaped.
//! Anything else is left alone. The filter sits in a rendering path, so it
//! never fails: every problem degrades to "leave the attribute unchanged".

mod error;

pub use error::FilterError;

use anyhow::{bail, Context, Result};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

use crate::document::{Document, Element};
use crate::oracle::ExistenceOracle;
use crate::owner::{FilterContext, OwnerContext};
use crate::upload_path::{classify, escape_path};

/// What to do when the oracle cannot confirm an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistencePolicy {
    /// Rewrite regardless; the rewrite is a URL transformation, not an
    /// access decision.
    #[default]
    RewriteAnyway,
    /// Leave the link unchanged unless the upload is confirmed.
    RequireExisting,
}

/// Counters for one document pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Attribute values that classified as upload paths.
    pub candidates: usize,
    pub rewritten: usize,
    /// Rewritten without the oracle confirming the upload.
    pub unconfirmed: usize,
    /// The context resolved to no owner; the document was left untouched.
    pub missing_context: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Link,
    Image,
}

enum Outcome {
    NotCandidate,
    Kept,
    Rewritten { url: String, confirmed: bool },
}

pub struct UploadLinkFilter {
    base_url: String,
    oracle: Arc<dyn ExistenceOracle>,
    policy: ExistencePolicy,
}

impl UploadLinkFilter {
    /// Builds a filter for the given origin (e.g. `https://git.example.com`,
    /// optionally with a relative root such as `/gitlab`).
    pub fn new(base_url: &str, oracle: Arc<dyn ExistenceOracle>) -> Result<Self> {
        let parsed =
            Url::parse(base_url).with_context(|| format!("invalid base URL: {base_url}"))?;
        if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
            bail!("base URL must be an origin with a host: {base_url}");
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            bail!("base URL must not carry a query or fragment: {base_url}");
        }
        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            oracle,
            policy: ExistencePolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: ExistencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> ExistencePolicy {
        self.policy
    }

    /// Rewrites `document` and hands it back.
    pub fn call(&self, mut document: Document, context: &FilterContext) -> Document {
        self.rewrite(&mut document, context);
        document
    }

    /// Rewrites upload links in place. Only attribute values change; nodes
    /// are never added, removed or reordered.
    pub fn rewrite(&self, document: &mut Document, context: &FilterContext) -> RewriteStats {
        let owner = OwnerContext::resolve(context);
        let segment = owner.base_segment();
        let mut stats = RewriteStats::default();

        document.for_each_element_mut(|element| {
            let Some((attr, kind)) = candidate_attr(element) else {
                return;
            };
            let Some(value) = element.attr_mut(attr) else {
                return;
            };
            match self.rewrite_value(value, kind, segment.as_deref()) {
                Ok(Outcome::NotCandidate) => {}
                Ok(Outcome::Kept) => stats.candidates += 1,
                Ok(Outcome::Rewritten { url, confirmed }) => {
                    stats.candidates += 1;
                    stats.rewritten += 1;
                    if !confirmed {
                        stats.unconfirmed += 1;
                    }
                    *value = url;
                }
                Err(FilterError::MissingContext) => {
                    stats.candidates += 1;
                    stats.missing_context = true;
                }
                Err(e @ FilterError::OracleUnavailable { .. }) => {
                    stats.candidates += 1;
                    tracing::debug!("upload link left unchanged: {}", e);
                }
                Err(e) => tracing::debug!("link left unchanged: {}", e),
            }
        });

        if stats.missing_context {
            tracing::debug!(
                candidates = stats.candidates,
                "no project or group in context; upload links left unchanged"
            );
        }
        stats
    }

    fn rewrite_value(
        &self,
        raw: &str,
        kind: LinkKind,
        segment: Option<&str>,
    ) -> Result<Outcome, FilterError> {
        let reference = classify(raw);
        if !reference.is_well_formed {
            return Err(FilterError::MalformedUri(raw.to_string()));
        }
        let Some(upload_path) = reference.upload_path.as_deref() else {
            return Ok(Outcome::NotCandidate);
        };
        let segment = segment.ok_or(FilterError::MissingContext)?;

        let lookup = format!("{}/{}", segment, decode_segments(upload_path));
        let confirmed = match self.confirm(&lookup, kind) {
            Ok(found) => found,
            Err(e) if self.policy == ExistencePolicy::RequireExisting => return Err(e),
            Err(e) => {
                tracing::debug!("rewriting without confirmation: {}", e);
                false
            }
        };
        if !confirmed && self.policy == ExistencePolicy::RequireExisting {
            tracing::debug!(path = %lookup, "upload not found; link left unchanged");
            return Ok(Outcome::Kept);
        }

        let url = format!(
            "{}/{}/{}{}",
            self.base_url,
            escape_path(segment),
            escape_path(upload_path),
            reference.suffix
        );
        Ok(Outcome::Rewritten { url, confirmed })
    }

    /// One oracle call per candidate: images are checked as images, links
    /// only for existence.
    fn confirm(&self, lookup: &str, kind: LinkKind) -> Result<bool, FilterError> {
        let answer = match kind {
            LinkKind::Image => self.oracle.is_image(lookup),
            LinkKind::Link => self.oracle.exists(lookup),
        };
        answer.map_err(|source| FilterError::OracleUnavailable {
            path: lookup.to_string(),
            source,
        })
    }
}

/// Percent-decodes each segment on its own so an encoded `/` inside a
/// segment can never split it in two.
fn decode_segments(path: &str) -> String {
    path.split('/')
        .map(|s| percent_decode_str(s).decode_utf8_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Attribute to inspect on this element, if it is a link or an image.
fn candidate_attr(element: &Element) -> Option<(&'static str, LinkKind)> {
    if element.is("a") {
        Some(("href", LinkKind::Link))
    } else if element.is("img") {
        Some(("src", LinkKind::Image))
    } else {
        None
    }
}

#[cfg(test)]
mod tests;
