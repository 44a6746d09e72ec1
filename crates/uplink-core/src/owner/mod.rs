//! Owner context: which project or group a document is rendered for.
//!
//! The caller hands over a loose [`FilterContext`] (maybe a project, maybe a
//! group, maybe neither). It is resolved once per document into a closed
//! [`OwnerContext`], which supplies the path prefix for every rewritten link.

mod hierarchy;

pub use hierarchy::{full_path_from_chain, Group, GroupId, GroupTree, HierarchyError};

use serde::{Deserialize, Serialize};

/// A project as seen by the filter: its full path already includes any
/// parent groups (e.g. `group/subgroup/project`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub full_path: String,
}

/// A group as seen by the filter; `full_path` is the ancestor chain joined
/// by `/` (e.g. `group1/subgroup1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub full_path: String,
}

/// Loosely-typed rendering context as supplied by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterContext {
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub group: Option<GroupRef>,
}

impl ProjectRef {
    pub fn new(full_path: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
        }
    }
}

impl GroupRef {
    pub fn new(full_path: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
        }
    }
}

impl FilterContext {
    pub fn for_project(full_path: impl Into<String>) -> Self {
        Self {
            project: Some(ProjectRef::new(full_path)),
            group: None,
        }
    }

    pub fn for_group(full_path: impl Into<String>) -> Self {
        Self {
            project: None,
            group: Some(GroupRef::new(full_path)),
        }
    }
}

/// Resolved rewriting scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerContext {
    None,
    Project { full_path: String },
    Group { full_path: String },
}

impl OwnerContext {
    /// Resolves the loose context. A project wins over a group when both are
    /// present; blank paths count as absent.
    pub fn resolve(context: &FilterContext) -> Self {
        if let Some(path) = context.project.as_ref().and_then(|p| normalize(&p.full_path)) {
            return OwnerContext::Project { full_path: path };
        }
        if let Some(path) = context.group.as_ref().and_then(|g| normalize(&g.full_path)) {
            return OwnerContext::Group { full_path: path };
        }
        OwnerContext::None
    }

    /// Path segment placed between the base URL and the upload path:
    /// `<project path>` or `groups/<group path>/-`.
    pub fn base_segment(&self) -> Option<String> {
        match self {
            OwnerContext::None => None,
            OwnerContext::Project { full_path } => Some(full_path.clone()),
            OwnerContext::Group { full_path } => Some(format!("groups/{full_path}/-")),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, OwnerContext::None)
    }
}

/// Trims surrounding whitespace and slashes; `None` when nothing is left.
fn normalize(full_path: &str) -> Option<String> {
    let trimmed = full_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_segment_is_full_path() {
        let owner = OwnerContext::resolve(&FilterContext::for_project("group/proj"));
        assert_eq!(
            owner,
            OwnerContext::Project {
                full_path: "group/proj".into()
            }
        );
        assert_eq!(owner.base_segment().as_deref(), Some("group/proj"));
    }

    #[test]
    fn group_segment_is_scoped() {
        let owner = OwnerContext::resolve(&FilterContext::for_group("group1"));
        assert_eq!(owner.base_segment().as_deref(), Some("groups/group1/-"));
    }

    #[test]
    fn subgroup_path_is_propagated() {
        let owner = OwnerContext::resolve(&FilterContext::for_group("group1/subgroup1"));
        assert_eq!(owner.base_segment().as_deref(), Some("groups/group1/subgroup1/-"));
    }

    #[test]
    fn project_takes_precedence_over_group() {
        let ctx = FilterContext {
            project: Some(ProjectRef::new("g/p")),
            group: Some(GroupRef::new("g")),
        };
        assert_eq!(OwnerContext::resolve(&ctx).base_segment().as_deref(), Some("g/p"));
    }

    #[test]
    fn blank_project_falls_back_to_group() {
        let ctx = FilterContext {
            project: Some(ProjectRef::new("  ")),
            group: Some(GroupRef::new("/g/")),
        };
        assert_eq!(OwnerContext::resolve(&ctx).base_segment().as_deref(), Some("groups/g/-"));
    }

    #[test]
    fn neither_resolves_to_none() {
        let owner = OwnerContext::resolve(&FilterContext::default());
        assert!(owner.is_none());
        assert_eq!(owner.base_segment(), None);

        let ctx = FilterContext {
            project: Some(ProjectRef::new("")),
            group: None,
        };
        assert!(OwnerContext::resolve(&ctx).is_none());
    }

    #[test]
    fn context_from_json() {
        let ctx: FilterContext =
            serde_json::from_str(r#"{"project":null,"group":{"full_path":"a/b"}}"#).unwrap();
        assert_eq!(OwnerContext::resolve(&ctx).base_segment().as_deref(), Some("groups/a/b/-"));
        let empty: FilterContext = serde_json::from_str("{}").unwrap();
        assert!(OwnerContext::resolve(&empty).is_none());
    }
}
