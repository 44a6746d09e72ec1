//! `uplink group-path <groups.json> <id>` – full path of a (sub)group.

use anyhow::{Context, Result};
use std::path::Path;
use uplink_core::owner::{GroupId, GroupTree};

/// Reads a JSON group list into a tree.
pub fn load_group_tree(path: &Path) -> Result<GroupTree> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read group list: {}", path.display()))?;
    let tree: GroupTree = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse group list JSON: {}", path.display()))?;
    Ok(tree)
}

pub fn run_group_path(groups: &Path, id: GroupId) -> Result<()> {
    let tree = load_group_tree(groups)?;
    let full_path = tree
        .full_path(id)
        .with_context(|| format!("resolve group {id} in {}", groups.display()))?;
    println!("{full_path}");
    Ok(())
}
