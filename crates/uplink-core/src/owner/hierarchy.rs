//! Group hierarchy: compute a group's full path from its parent chain.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::GroupRef;

pub type GroupId = u64;

/// One group as stored by the group collaborator: its own path segment and
/// an optional parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub path: String,
    #[serde(default)]
    pub parent_id: Option<GroupId>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("unknown group {0}")]
    UnknownGroup(GroupId),
    #[error("group {0} has a cyclic parent chain")]
    Cycle(GroupId),
}

/// Explicit id → group map. Full paths are derived on demand, never cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Group>", into = "Vec<Group>")]
pub struct GroupTree {
    groups: HashMap<GroupId, Group>,
}

impl From<Vec<Group>> for GroupTree {
    fn from(groups: Vec<Group>) -> Self {
        let mut tree = GroupTree::default();
        for g in groups {
            tree.insert(g);
        }
        tree
    }
}

impl From<GroupTree> for Vec<Group> {
    fn from(tree: GroupTree) -> Self {
        let mut groups: Vec<Group> = tree.groups.into_values().collect();
        groups.sort_by_key(|g| g.id);
        groups
    }
}

impl GroupTree {
    pub fn insert(&mut self, group: Group) {
        self.groups.insert(group.id, group);
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Root-first list of path segments from the top-level ancestor down to `id`.
    ///
    /// Walks the parent chain once. A group seen twice means the chain loops.
    pub fn ancestor_chain(&self, id: GroupId) -> Result<Vec<&str>, HierarchyError> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(id);
        while let Some(gid) = current {
            if !visited.insert(gid) {
                return Err(HierarchyError::Cycle(id));
            }
            let group = self.get(gid).ok_or(HierarchyError::UnknownGroup(gid))?;
            chain.push(group.path.as_str());
            current = group.parent_id;
        }
        chain.reverse();
        Ok(chain)
    }

    /// `parent/child/...` for the given group.
    pub fn full_path(&self, id: GroupId) -> Result<String, HierarchyError> {
        Ok(full_path_from_chain(&self.ancestor_chain(id)?))
    }

    /// Group reference ready to go into a `FilterContext`.
    pub fn group_ref(&self, id: GroupId) -> Result<GroupRef, HierarchyError> {
        Ok(GroupRef::new(self.full_path(id)?))
    }
}

/// Joins a root-first ancestor chain with `/`, skipping empty segments.
pub fn full_path_from_chain<S: AsRef<str>>(chain: &[S]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref().trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
