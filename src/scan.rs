//! Content scanning and manifest construction.
//!
//! Stage 1 of the build. Produces the [`ManifestRoot`] every later stage reads.
//!
//! ## Sources
//!
//! A docs root may carry a hand-authored `manifest.json`. When present it is
//! authoritative: its order is the sidebar order and nothing on disk is walked.
//!
//! Otherwise the directory tree is scanned:
//!
//! ```text
//! docs/
//! ├── config.toml          # Site configuration (optional)
//! ├── manifest.json        # Hand-authored tree (optional, wins over scanning)
//! ├── images/              # Copied verbatim, never scanned for notes
//! ├── DSA/
//! │   ├── README.md        # Listed first in its folder
//! │   └── Arrays.md
//! ├── Database/
//! │   ├── README.md
//! │   └── NoSQL/
//! │       └── Redis.md
//! └── Welcome.md
//! ```
//!
//! ## Rules
//!
//! - Hidden directories (leading `.`) and the build/tooling directories in
//!   [`SKIPPED_DIRS`] are never entered
//! - Every `*.md` file becomes a note named by its file stem
//! - Folders with no notes anywhere below them are dropped
//! - Within a folder `README` comes first, then everything else by file name

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::manifest::{ManifestNode, ManifestRoot};
use crate::naming::{MARKDOWN_EXT, README};

/// File name of a hand-authored manifest in the docs root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Directory names never scanned for notes.
pub const SKIPPED_DIRS: &[&str] = &["node_modules", "src", "assets", ".next", "images"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Docs root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Build the manifest for a docs root.
pub fn scan(root: &Path) -> Result<ManifestRoot, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let manifest_path = root.join(MANIFEST_FILE);
    if manifest_path.is_file() {
        tracing::debug!(path = %manifest_path.display(), "loading hand-authored manifest");
        return load_manifest(&manifest_path);
    }

    tracing::debug!(root = %root.display(), "scanning docs directory");
    let children = scan_directory(root, root)?;
    Ok(ManifestRoot::new(children))
}

/// Parse a `manifest.json` file.
pub fn load_manifest(path: &Path) -> Result<ManifestRoot, ScanError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ScanError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

fn scan_directory(dir: &Path, root: &Path) -> Result<Vec<ManifestNode>, ScanError> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by(|a, b| {
            sort_key(a.path(), a.file_type().is_file())
                .cmp(&sort_key(b.path(), b.file_type().is_file()))
        })
        .into_iter()
        .filter_entry(|e| !e.file_type().is_dir() || !is_skipped_dir(e.file_name()));

    let mut nodes = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();

        if entry.file_type().is_dir() {
            let children = scan_directory(path, root)?;
            // Folders without notes never reach the sidebar.
            if !children.is_empty() {
                nodes.push(ManifestNode::folder(name, children));
            }
        } else if entry.file_type().is_file() {
            if let Some(stem) = name.strip_suffix(MARKDOWN_EXT) {
                nodes.push(ManifestNode::file(stem, relative_path(path, root)));
            }
        }
    }
    Ok(nodes)
}

fn is_skipped_dir(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

/// README sorts before everything else in its folder.
fn sort_key(path: &Path, is_file: bool) -> (bool, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let is_readme = is_file && name.strip_suffix(MARKDOWN_EXT) == Some(README);
    (!is_readme, name)
}

/// POSIX-style path relative to the docs root.
fn relative_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_manifest, setup_fixtures};
    use tempfile::TempDir;

    #[test]
    fn fixtures_scan_to_sample_manifest() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest, sample_manifest());
    }

    #[test]
    fn readme_listed_first() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let dsa = manifest.find_folder(&["DSA"]).unwrap();
        let names: Vec<&str> = dsa.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["README", "Arrays"]);
    }

    #[test]
    fn skipped_and_hidden_directories_ignored() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let paths: Vec<String> = manifest.entries().into_iter().map(|e| e.path).collect();
        assert!(!paths.iter().any(|p| p.starts_with("node_modules/")));
        assert!(!paths.iter().any(|p| p.starts_with(".drafts/")));
        assert!(!paths.iter().any(|p| p.starts_with("images/")));
    }

    #[test]
    fn folders_without_notes_dropped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Empty/Deeper")).unwrap();
        fs::write(tmp.path().join("Empty/notes.txt"), "not markdown").unwrap();
        fs::write(tmp.path().join("Only.md"), "# Only").unwrap();

        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.children, vec![ManifestNode::file("Only", "Only.md")]);
    }

    #[test]
    fn nested_paths_are_posix_relative() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("A/B")).unwrap();
        fs::write(tmp.path().join("A/B/Deep.md"), "# Deep").unwrap();

        let manifest = scan(tmp.path()).unwrap();
        let entries = manifest.entries();
        assert_eq!(entries[0].path, "A/B/Deep.md");
        assert_eq!(entries[0].parent_path, "A/B");
    }

    #[test]
    fn manifest_json_is_authoritative() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Zebra.md"), "# Zebra").unwrap();
        fs::write(tmp.path().join("Apple.md"), "# Apple").unwrap();
        fs::write(
            tmp.path().join(MANIFEST_FILE),
            r#"{"name":"root","children":[
                {"name":"Zebra","path":"Zebra.md"},
                {"name":"Apple","path":"Apple.md"}
            ]}"#,
        )
        .unwrap();

        let manifest = scan(tmp.path()).unwrap();
        let names: Vec<&str> = manifest.children.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Zebra", "Apple"]);
    }

    #[test]
    fn invalid_manifest_json_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), "{ not json").unwrap();
        let result = scan(tmp.path());
        assert!(matches!(result, Err(ScanError::Manifest { .. })));
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn empty_root_has_no_children() {
        let tmp = TempDir::new().unwrap();
        let manifest = scan(tmp.path()).unwrap();
        assert!(manifest.children.is_empty());
        assert_eq!(manifest.name, "root");
    }
}
