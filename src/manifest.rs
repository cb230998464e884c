//! The manifest: an ordered tree of folders and markdown notes.
//!
//! The manifest is built once (see [`crate::scan`]) and only read afterwards.
//! Every other layer derives what it needs from it:
//!
//! - the sidebar walks the tree ([`crate::nav`])
//! - search and static generation use the flattened leaves ([`FlatEntry`])
//! - the page composer looks folders and files up by slug ([`crate::page`])
//!
//! ## JSON Shape
//!
//! A hand-authored `manifest.json` uses the same shape the client script
//! reads:
//!
//! ```json
//! { "name": "root", "children": [
//!     { "name": "DSA", "children": [
//!         { "name": "README", "path": "DSA/README.md" },
//!         { "name": "Arrays", "path": "DSA/Arrays.md" }
//!     ] }
//! ] }
//! ```
//!
//! Each node carries exactly one of `path` (a note) or `children` (a folder).

use serde::{Deserialize, Serialize};

pub use crate::naming::format_category_name;
use crate::naming::README;

/// A folder or a note in the manifest tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub enum ManifestNode {
    Folder {
        name: String,
        children: Vec<ManifestNode>,
    },
    File {
        name: String,
        path: String,
    },
}

/// Wire form of a node: `path` and `children` are mutually exclusive.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNode {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<ManifestNode>>,
}

impl TryFrom<RawNode> for ManifestNode {
    type Error = String;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        match (raw.path, raw.children) {
            (Some(path), None) => Ok(ManifestNode::File {
                name: raw.name,
                path,
            }),
            (None, Some(children)) => Ok(ManifestNode::Folder {
                name: raw.name,
                children,
            }),
            (Some(_), Some(_)) => Err(format!(
                "manifest node '{}' has both a path and children",
                raw.name
            )),
            (None, None) => Err(format!(
                "manifest node '{}' has neither a path nor children",
                raw.name
            )),
        }
    }
}

impl From<ManifestNode> for RawNode {
    fn from(node: ManifestNode) -> Self {
        match node {
            ManifestNode::Folder { name, children } => RawNode {
                name,
                path: None,
                children: Some(children),
            },
            ManifestNode::File { name, path } => RawNode {
                name,
                path: Some(path),
                children: None,
            },
        }
    }
}

impl ManifestNode {
    pub fn folder(name: impl Into<String>, children: Vec<ManifestNode>) -> Self {
        ManifestNode::Folder {
            name: name.into(),
            children,
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        ManifestNode::File {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ManifestNode::Folder { name, .. } | ManifestNode::File { name, .. } => name,
        }
    }

    /// Content path of a note; `None` for folders.
    pub fn path(&self) -> Option<&str> {
        match self {
            ManifestNode::File { path, .. } => Some(path),
            ManifestNode::Folder { .. } => None,
        }
    }

    /// Children of a folder; empty for notes.
    pub fn children(&self) -> &[ManifestNode] {
        match self {
            ManifestNode::Folder { children, .. } => children,
            ManifestNode::File { .. } => &[],
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, ManifestNode::Folder { .. })
    }

    /// The folder's `README` note, if it has one.
    pub fn readme(&self) -> Option<&ManifestNode> {
        self.children()
            .iter()
            .find(|c| !c.is_folder() && c.name() == README)
    }

    /// First note under this folder in pre-order, subfolders included.
    pub fn first_note(&self) -> Option<&ManifestNode> {
        self.children().iter().find_map(|c| match c {
            ManifestNode::File { .. } => Some(c),
            ManifestNode::Folder { .. } => c.first_note(),
        })
    }
}

/// The root of the manifest tree. Never has a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRoot {
    #[serde(default = "root_name")]
    pub name: String,
    pub children: Vec<ManifestNode>,
}

fn root_name() -> String {
    "root".to_string()
}

/// One note, denormalized for search and listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatEntry {
    pub name: String,
    pub path: String,
    /// `/`-joined names of the ancestor folders.
    pub parent_path: String,
}

impl ManifestRoot {
    pub fn new(children: Vec<ManifestNode>) -> Self {
        Self {
            name: root_name(),
            children,
        }
    }

    /// Every note in depth-first pre-order. See [`get_all_entries`].
    pub fn entries(&self) -> Vec<FlatEntry> {
        get_all_entries(self)
    }

    /// Total number of notes in the tree.
    pub fn file_count(&self) -> usize {
        self.children.iter().map(count_files).sum()
    }

    /// Find a folder whose names match `parts` in sequence.
    pub fn find_folder(&self, parts: &[&str]) -> Option<&ManifestNode> {
        let (first, rest) = parts.split_first()?;
        let mut current = self
            .children
            .iter()
            .find(|c| c.is_folder() && c.name() == *first)?;
        for part in rest {
            current = current
                .children()
                .iter()
                .find(|c| c.is_folder() && c.name() == *part)?;
        }
        Some(current)
    }

    /// Find the node addressed by a URL slug.
    ///
    /// Every segment but the last names a folder. The last may name a folder
    /// or a note (by its path's final segment with `.md` stripped); a folder
    /// wins over a note of the same name.
    pub fn find(&self, parts: &[&str]) -> Option<&ManifestNode> {
        let (last, parents) = parts.split_last()?;
        let siblings = if parents.is_empty() {
            &self.children[..]
        } else {
            self.find_folder(parents)?.children()
        };
        siblings
            .iter()
            .find(|node| node.is_folder() && node.name() == *last)
            .or_else(|| {
                siblings.iter().find(|node| match node {
                    ManifestNode::File { path, .. } => {
                        crate::naming::fallback_title(path).as_deref() == Some(*last)
                    }
                    ManifestNode::Folder { .. } => false,
                })
            })
    }

    /// Find the note with the given content path.
    pub fn find_file(&self, path: &str) -> Option<&ManifestNode> {
        fn walk<'a>(nodes: &'a [ManifestNode], path: &str) -> Option<&'a ManifestNode> {
            for node in nodes {
                match node {
                    ManifestNode::File { path: p, .. } if p == path => return Some(node),
                    ManifestNode::File { .. } => {}
                    ManifestNode::Folder { children, .. } => {
                        if let Some(found) = walk(children, path) {
                            return Some(found);
                        }
                    }
                }
            }
            None
        }
        walk(&self.children, path)
    }

    /// Folder ids (`/`-joined name chains) of every ancestor of a note.
    ///
    /// Ordered outermost first. Empty when the note is not in the tree or
    /// sits directly under the root.
    pub fn ancestor_folder_ids(&self, path: &str) -> Vec<String> {
        fn walk(
            node: &ManifestNode,
            parent_id: &str,
            ancestors: &mut Vec<String>,
            path: &str,
        ) -> bool {
            match node {
                ManifestNode::File { path: p, .. } => p == path,
                ManifestNode::Folder { name, children } => {
                    let id = folder_id(parent_id, name);
                    ancestors.push(id.clone());
                    if children.iter().any(|c| walk(c, &id, ancestors, path)) {
                        return true;
                    }
                    ancestors.pop();
                    false
                }
            }
        }

        let mut ancestors = Vec::new();
        for child in &self.children {
            if walk(child, "", &mut ancestors, path) {
                return ancestors;
            }
        }
        Vec::new()
    }

    /// Ids of every folder in the tree, in pre-order.
    pub fn folder_ids(&self) -> Vec<String> {
        fn walk(node: &ManifestNode, parent_id: &str, ids: &mut Vec<String>) {
            if let ManifestNode::Folder { name, children } = node {
                let id = folder_id(parent_id, name);
                ids.push(id.clone());
                for child in children {
                    walk(child, &id, ids);
                }
            }
        }
        let mut ids = Vec::new();
        for child in &self.children {
            walk(child, "", &mut ids);
        }
        ids
    }
}

/// Id of a folder given its parent's id: the `/`-joined name chain.
pub fn folder_id(parent_id: &str, name: &str) -> String {
    if parent_id.is_empty() {
        name.to_string()
    } else {
        format!("{parent_id}/{name}")
    }
}

/// Flatten the manifest into one entry per note.
///
/// Depth-first pre-order, so repeated calls on the same manifest always
/// return the same order. The root contributes no path segment.
pub fn get_all_entries(root: &ManifestRoot) -> Vec<FlatEntry> {
    fn collect(node: &ManifestNode, parent_path: &str, entries: &mut Vec<FlatEntry>) {
        match node {
            ManifestNode::File { name, path } => entries.push(FlatEntry {
                name: name.clone(),
                path: path.clone(),
                parent_path: parent_path.to_string(),
            }),
            ManifestNode::Folder { name, children } => {
                let current = folder_id(parent_path, name);
                for child in children {
                    collect(child, &current, entries);
                }
            }
        }
    }

    let mut entries = Vec::new();
    for child in &root.children {
        collect(child, "", &mut entries);
    }
    entries
}

/// Number of notes under a node. A note counts as one.
pub fn count_files(node: &ManifestNode) -> usize {
    match node {
        ManifestNode::File { .. } => 1,
        ManifestNode::Folder { children, .. } => children.iter().map(count_files).sum(),
    }
}
