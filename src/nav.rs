//! Sidebar navigation: collapse state, filtering and tree markup.
//!
//! Folders are identified by the `/`-joined chain of their names
//! (`Database/NoSQL`). [`NavState`] owns the set of collapsed folder ids;
//! filtering never touches it, so clearing a filter restores exactly the
//! collapse state from before.
//!
//! The rendered tree carries `data-folder-id` and `data-path` hooks so the
//! client script can replay the same toggle and filter rules in the browser.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use maud::{Markup, PreEscaped, html};

use crate::manifest::{ManifestNode, ManifestRoot, folder_id};
use crate::naming::href_for_path;

const CHEVRON: &str = r#"<svg class="tree-chevron" width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><polyline points="9 18 15 12 9 6"></polyline></svg>"#;

/// Which folders are collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavState {
    collapsed: BTreeSet<String>,
}

impl NavState {
    /// Initial state: every folder collapsed.
    pub fn new(root: &ManifestRoot) -> Self {
        Self {
            collapsed: root.folder_ids().into_iter().collect(),
        }
    }

    /// State with an explicit collapsed set, e.g. restored from preferences.
    pub fn from_collapsed(collapsed: impl IntoIterator<Item = String>) -> Self {
        Self {
            collapsed: collapsed.into_iter().collect(),
        }
    }

    pub fn collapsed(&self) -> &BTreeSet<String> {
        &self.collapsed
    }

    pub fn is_collapsed(&self, folder_id: &str) -> bool {
        self.collapsed.contains(folder_id)
    }

    /// Flip one folder between collapsed and expanded.
    pub fn toggle(&mut self, folder_id: &str) {
        if !self.collapsed.remove(folder_id) {
            self.collapsed.insert(folder_id.to_string());
        }
    }

    /// Expand every ancestor folder of a note. Other folders are untouched.
    pub fn expand_to_path(&mut self, root: &ManifestRoot, path: &str) {
        for id in root.ancestor_folder_ids(path) {
            self.collapsed.remove(&id);
        }
    }

    /// Presentation of the tree for a filter query.
    ///
    /// A blank query shows the tree as the collapse state describes it. Any
    /// other query opens every folder and hides notes whose name and path
    /// both miss the query (case-insensitive).
    pub fn filter(&self, root: &ManifestRoot, query: &str) -> NavView<'_> {
        let query = query.trim().to_lowercase();
        let matches = if query.is_empty() {
            None
        } else {
            Some(
                root.entries()
                    .into_iter()
                    .filter(|e| {
                        e.name.to_lowercase().contains(&query)
                            || e.path.to_lowercase().contains(&query)
                    })
                    .map(|e| e.path)
                    .collect(),
            )
        };
        NavView {
            collapsed: &self.collapsed,
            matches,
        }
    }

    /// View with no filter applied.
    pub fn view(&self) -> NavView<'_> {
        NavView {
            collapsed: &self.collapsed,
            matches: None,
        }
    }
}

/// What the sidebar shows for one state and one filter query.
#[derive(Debug)]
pub struct NavView<'a> {
    collapsed: &'a BTreeSet<String>,
    /// Paths of matching notes; `None` when no filter is active.
    matches: Option<HashSet<String>>,
}

impl NavView<'_> {
    pub fn is_filtering(&self) -> bool {
        self.matches.is_some()
    }

    pub fn is_open(&self, folder_id: &str) -> bool {
        self.is_filtering() || !self.collapsed.contains(folder_id)
    }

    pub fn is_visible(&self, path: &str) -> bool {
        self.matches.as_ref().is_none_or(|m| m.contains(path))
    }
}

/// Display order inside a folder: folders first, then by name.
pub fn sort_children(children: &[ManifestNode]) -> Vec<&ManifestNode> {
    let mut sorted: Vec<&ManifestNode> = children.iter().collect();
    sorted.sort_by(|a, b| match (a.is_folder(), b.is_folder()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_names(a.name(), b.name()),
    });
    sorted
}

/// Case-insensitive; on a tie the lowercase spelling comes first.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Render the sidebar tree.
///
/// Top-level entries keep manifest order; folder contents follow
/// [`sort_children`].
pub fn render_tree(root: &ManifestRoot, view: &NavView, active_path: Option<&str>) -> Markup {
    html! {
        div.tree-root {
            @for child in &root.children {
                (render_node(child, 0, "", view, active_path))
            }
        }
    }
}

fn render_node(
    node: &ManifestNode,
    depth: usize,
    parent_id: &str,
    view: &NavView,
    active_path: Option<&str>,
) -> Markup {
    match node {
        ManifestNode::Folder { name, children } => {
            let id = folder_id(parent_id, name);
            let open = view.is_open(&id);
            html! {
                div.tree-node {
                    button.tree-folder.collapsed[!open]
                        type="button"
                        data-folder-id=(id)
                        data-depth=(depth)
                        aria-expanded=(if open { "true" } else { "false" })
                        style=(format!("padding-left: calc({depth} * var(--tree-indent, 16px) + 12px)")) {
                        span.tree-chevron-wrapper { (PreEscaped(CHEVRON)) }
                        span.tree-label { (name) }
                    }
                    div.tree-children.collapsed[!open] {
                        @for child in sort_children(children) {
                            (render_node(child, depth + 1, &id, view, active_path))
                        }
                    }
                }
            }
        }
        ManifestNode::File { name, path } => {
            let active = active_path == Some(path.as_str());
            html! {
                div.tree-node {
                    a.tree-file.active[active]
                        href=(href_for_path(path))
                        data-path=(path)
                        data-depth=(depth)
                        title=(name)
                        hidden[!view.is_visible(path)]
                        style=(format!("padding-left: calc({depth} * var(--tree-indent, 16px) + 28px)")) {
                        span.tree-label { (name) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_manifest;

    #[test]
    fn every_folder_starts_collapsed() {
        let manifest = sample_manifest();
        let state = NavState::new(&manifest);
        for id in ["DSA", "Database", "Database/NoSQL", "DevOps"] {
            assert!(state.is_collapsed(id), "{id} should start collapsed");
        }
    }

    #[test]
    fn toggle_twice_restores_state() {
        let manifest = sample_manifest();
        let mut state = NavState::new(&manifest);
        let before = state.clone();
        state.toggle("DSA");
        assert!(!state.is_collapsed("DSA"));
        state.toggle("DSA");
        assert_eq!(state, before);
    }

    #[test]
    fn expand_to_path_opens_only_ancestors() {
        let manifest = sample_manifest();
        let mut state = NavState::new(&manifest);
        state.expand_to_path(&manifest, "Database/NoSQL/Redis.md");
        assert!(!state.is_collapsed("Database"));
        assert!(!state.is_collapsed("Database/NoSQL"));
        assert!(state.is_collapsed("DSA"));
        assert!(state.is_collapsed("DevOps"));
    }

    #[test]
    fn expand_to_unknown_path_is_noop() {
        let manifest = sample_manifest();
        let mut state = NavState::new(&manifest);
        let before = state.clone();
        state.expand_to_path(&manifest, "Nope.md");
        assert_eq!(state, before);
    }

    #[test]
    fn filter_opens_folders_and_hides_misses() {
        let manifest = sample_manifest();
        let state = NavState::new(&manifest);
        let view = state.filter(&manifest, "  REDIS ");
        assert!(view.is_filtering());
        assert!(view.is_open("DSA"));
        assert!(view.is_visible("Database/NoSQL/Redis.md"));
        assert!(!view.is_visible("DSA/Arrays.md"));
    }

    #[test]
    fn filter_matches_path_as_well_as_name() {
        let manifest = sample_manifest();
        let state = NavState::new(&manifest);
        let view = state.filter(&manifest, "nosql/");
        assert!(view.is_visible("Database/NoSQL/README.md"));
        assert!(view.is_visible("Database/NoSQL/Redis.md"));
        assert!(!view.is_visible("Database/README.md"));
    }

    #[test]
    fn clearing_filter_restores_collapse_state() {
        let manifest = sample_manifest();
        let mut state = NavState::new(&manifest);
        state.toggle("DSA");
        let before = state.clone();

        let filtered = state.filter(&manifest, "arrays");
        assert!(filtered.is_open("DevOps"));

        let cleared = state.filter(&manifest, "");
        assert!(!cleared.is_filtering());
        assert!(cleared.is_open("DSA"));
        assert!(!cleared.is_open("DevOps"));
        assert!(cleared.is_visible("DSA/Arrays.md"));
        assert_eq!(state, before);
    }

    #[test]
    fn sort_folders_first_then_name() {
        let children = vec![
            ManifestNode::file("zeta", "zeta.md"),
            ManifestNode::folder("Beta", vec![]),
            ManifestNode::file("Alpha", "Alpha.md"),
            ManifestNode::folder("alpha", vec![]),
        ];
        let names: Vec<&str> = sort_children(&children).iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["alpha", "Beta", "Alpha", "zeta"]);
    }

    #[test]
    fn sort_ties_put_lowercase_first() {
        let children = vec![
            ManifestNode::file("Alpha", "Alpha.md"),
            ManifestNode::file("alpha", "alpha.md"),
            ManifestNode::file("ALPHA", "ALPHA.md"),
        ];
        let names: Vec<&str> = sort_children(&children).iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["alpha", "Alpha", "ALPHA"]);
    }

    #[test]
    fn sorting_leaves_manifest_untouched() {
        let manifest = sample_manifest();
        let database = manifest.find_folder(&["Database"]).unwrap();
        let _ = sort_children(database.children());
        assert_eq!(database.children()[0].name(), "README");
    }

    // =========================================================================
    // Markup
    // =========================================================================

    #[test]
    fn render_marks_collapsed_folders_and_active_note() {
        let manifest = sample_manifest();
        let mut state = NavState::new(&manifest);
        state.expand_to_path(&manifest, "DSA/Arrays.md");
        let html = render_tree(&manifest, &state.view(), Some("DSA/Arrays.md")).into_string();

        assert!(html.contains(r#"data-folder-id="DSA""#));
        assert!(html.contains(r#"data-folder-id="Database/NoSQL""#));
        assert!(html.contains(r#"class="tree-file active" href="/docs/DSA/Arrays/""#));
        assert!(html.contains(r#"class="tree-folder collapsed" type="button" data-folder-id="DevOps""#));
        assert!(html.contains(r#"class="tree-folder" type="button" data-folder-id="DSA""#));
    }

    #[test]
    fn render_folder_contents_sorted_folders_first() {
        let manifest = sample_manifest();
        let state = NavState::new(&manifest);
        let html = render_tree(&manifest, &state.view(), None).into_string();
        let nosql = html.find(r#"data-folder-id="Database/NoSQL""#).unwrap();
        let readme = html.find(r#"data-path="Database/README.md""#).unwrap();
        assert!(nosql < readme);
    }

    #[test]
    fn render_filtered_tree_hides_misses_without_removing_them() {
        let manifest = sample_manifest();
        let state = NavState::new(&manifest);
        let html = render_tree(&manifest, &state.filter(&manifest, "docker"), None).into_string();
        assert!(!html.contains("tree-folder collapsed"));
        let arrays = html.find(r#"data-path="DSA/Arrays.md""#).unwrap();
        let tag_end = arrays + html[arrays..].find('>').unwrap();
        assert!(html[arrays..tag_end].contains("hidden"));
        let docker = html.find(r#"data-path="DevOps/Docker.md""#).unwrap();
        let tag_end = docker + html[docker..].find('>').unwrap();
        assert!(!html[docker..tag_end].contains("hidden"));
    }

    #[test]
    fn render_escapes_names() {
        let manifest = ManifestRoot::new(vec![ManifestNode::file("<b>", "b.md")]);
        let state = NavState::new(&manifest);
        let html = render_tree(&manifest, &state.view(), None).into_string();
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }
}
