//! Shared test utilities for the nano-ink test suite.
//!
//! Provides the fixture docs tree, an in-memory manifest with the same shape,
//! and lookup helpers that panic with the available names on a miss.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//! assert_eq!(manifest, sample_manifest());
//!
//! let arrays = find_entry(&manifest, "Arrays");
//! assert_eq!(arrays.parent_path, "DSA");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::manifest::{FlatEntry, ManifestNode, ManifestRoot};
use crate::types::{Heading, RenderedPage};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/docs/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// The manifest the fixture docs tree scans to.
pub fn sample_manifest() -> ManifestRoot {
    ManifestRoot::new(vec![
        ManifestNode::folder(
            "DSA",
            vec![
                ManifestNode::file("README", "DSA/README.md"),
                ManifestNode::file("Arrays", "DSA/Arrays.md"),
            ],
        ),
        ManifestNode::folder(
            "Database",
            vec![
                ManifestNode::file("README", "Database/README.md"),
                ManifestNode::folder(
                    "NoSQL",
                    vec![
                        ManifestNode::file("README", "Database/NoSQL/README.md"),
                        ManifestNode::file("Redis", "Database/NoSQL/Redis.md"),
                    ],
                ),
            ],
        ),
        ManifestNode::folder(
            "DevOps",
            vec![ManifestNode::file("Docker", "DevOps/Docker.md")],
        ),
        ManifestNode::file("Welcome", "Welcome.md"),
    ])
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a flattened entry by note name. Panics if not found.
pub fn find_entry(manifest: &ManifestRoot, name: &str) -> FlatEntry {
    let entries = manifest.entries();
    entries
        .iter()
        .find(|e| e.name == name)
        .cloned()
        .unwrap_or_else(|| {
            let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
            panic!("entry '{name}' not found. Available: {names:?}")
        })
}

/// Find a heading by id in a rendered page. Panics if not found.
pub fn find_heading<'a>(page: &'a RenderedPage, id: &str) -> &'a Heading {
    page.headings
        .iter()
        .find(|h| h.id == id)
        .unwrap_or_else(|| {
            let ids: Vec<&str> = page.headings.iter().map(|h| h.id.as_str()).collect();
            panic!("heading '{id}' not found. Available: {ids:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All heading ids in document order.
pub fn heading_ids(page: &RenderedPage) -> Vec<&str> {
    page.headings.iter().map(|h| h.id.as_str()).collect()
}

/// All entry paths in flatten order.
pub fn entry_paths(entries: &[FlatEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.path.as_str()).collect()
}
