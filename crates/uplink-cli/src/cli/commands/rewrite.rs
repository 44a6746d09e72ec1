//! `uplink rewrite <doc.json>` – rewrite upload links and print the document.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use uplink_core::config::UplinkConfig;
use uplink_core::document::Document;
use uplink_core::filter::UploadLinkFilter;
use uplink_core::oracle::{ExistenceOracle, FsUploadStore, StaticOracle, TimeoutOracle};
use uplink_core::owner::{FilterContext, GroupRef, ProjectRef};

use super::load_group_tree;
use crate::cli::RewriteArgs;

pub fn run_rewrite(cfg: &UplinkConfig, args: &RewriteArgs) -> Result<()> {
    let base_url = args.base_url.as_deref().unwrap_or(&cfg.base_url);
    let filter =
        UploadLinkFilter::new(base_url, build_oracle(cfg))?.with_policy(cfg.existence_policy);

    let context = build_context(args)?;
    let mut document = read_document(&args.document)?;
    let stats = filter.rewrite(&mut document, &context);
    tracing::info!(
        document = %args.document.display(),
        candidates = stats.candidates,
        rewritten = stats.rewritten,
        unconfirmed = stats.unconfirmed,
        missing_context = stats.missing_context,
        "rewrite finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!("{}", document.to_html());
    }
    Ok(())
}

/// Storage-backed oracle when an upload root is configured, otherwise every
/// upload is assumed present.
pub(crate) fn build_oracle(cfg: &UplinkConfig) -> Arc<dyn ExistenceOracle> {
    let oracle: Arc<dyn ExistenceOracle> = match &cfg.upload_root {
        Some(root) => Arc::new(FsUploadStore::new(root)),
        None => Arc::new(StaticOracle::assume_present()),
    };
    match cfg.oracle_timeout_ms {
        Some(ms) => Arc::new(TimeoutOracle::new(oracle, Duration::from_millis(ms))),
        None => oracle,
    }
}

pub(crate) fn build_context(args: &RewriteArgs) -> Result<FilterContext> {
    let group = match (&args.group, &args.groups, args.group_id) {
        (Some(full_path), _, _) => Some(GroupRef::new(full_path.clone())),
        (None, Some(groups), Some(id)) => {
            let tree = load_group_tree(groups)?;
            Some(
                tree.group_ref(id)
                    .with_context(|| format!("resolve group {id} in {}", groups.display()))?,
            )
        }
        _ => None,
    };
    Ok(FilterContext {
        project: args.project.clone().map(ProjectRef::new),
        group,
    })
}

fn read_document(path: &Path) -> Result<Document> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read document: {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("parse document JSON: {}", path.display()))
}
