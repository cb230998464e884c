//! CLI output formatting for every command.
//!
//! Output is **note-centric**: each note leads with its positional index and
//! title, with the source path as an indented `Source:` line. Folders show
//! their note count so the listing doubles as a content inventory.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Notes
//! 001 DSA (2 notes)
//!     001 README
//!         Source: DSA/README.md
//!     002 Arrays
//!         Source: DSA/Arrays.md
//! 002 Welcome
//!     Source: Welcome.md
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Not found → 404.html
//! 001 Arrays → docs/DSA/Arrays/index.html
//!     Source: DSA/Arrays.md
//!
//! Folders
//!     docs/DSA/index.html
//!
//! Generated 7 pages, 3 folder pages, 1 image
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::generate::{CheckReport, GenerateResult, INDEX_FILE, NOT_FOUND_FILE};
use crate::manifest::{FlatEntry, ManifestNode, ManifestRoot, count_files};
use crate::scan::MANIFEST_FILE;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Index + title, with a note count for folders.
///
/// ```text
/// 001 Database (3 notes)
/// 002 Welcome
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({})", format_index(index), title, plural(n, "note", "notes")),
        None => format!("{} {}", format_index(index), title),
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Format the discovered note tree in manifest order.
pub fn format_scan_output(manifest: &ManifestRoot, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Notes".to_string()];
    push_nodes(&manifest.children, 0, &mut lines);

    lines.push(String::new());
    lines.push("Config".to_string());
    for file in [CONFIG_FILE, MANIFEST_FILE] {
        if source_root.join(file).exists() {
            lines.push(format!("    {file}"));
        }
    }
    lines
}

fn push_nodes(nodes: &[ManifestNode], depth: usize, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let pad = indent(depth);
        match node {
            ManifestNode::Folder { name, children } => {
                lines.push(format!("{pad}{}", entity_header(i + 1, name, Some(count_files(node)))));
                push_nodes(children, depth + 1, lines);
            }
            ManifestNode::File { name, path } => {
                lines.push(format!("{pad}{}", entity_header(i + 1, name, None)));
                lines.push(format!("{pad}    Source: {path}"));
            }
        }
    }
}

pub fn print_scan_output(manifest: &ManifestRoot, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format what a build wrote.
pub fn format_build_output(result: &GenerateResult) -> Vec<String> {
    let mut lines = vec![
        format!("Home → {INDEX_FILE}"),
        format!("Not found → {NOT_FOUND_FILE}"),
    ];

    for (i, page) in result.pages.iter().enumerate() {
        lines.push(format!("{} {} → {}", format_index(i + 1), page.title, page.output));
        lines.push(format!("    Source: {}", page.source));
    }

    if !result.folder_aliases.is_empty() {
        lines.push(String::new());
        lines.push("Folders".to_string());
        for alias in &result.folder_aliases {
            lines.push(format!("    {alias}"));
        }
    }

    if !result.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped (unreadable)".to_string());
        for path in &result.skipped {
            lines.push(format!("    {path}"));
        }
    }

    if !result.assets.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for asset in &result.assets {
            lines.push(format!("    {asset}"));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(result.pages.len(), "page", "pages"),
        plural(result.folder_aliases.len(), "folder page", "folder pages"),
        plural(result.images_copied, "image", "images"),
    ));
    lines
}

pub fn print_build_output(result: &GenerateResult) {
    for line in format_build_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} in {}",
        plural(report.notes, "note", "notes"),
        plural(report.folders, "folder", "folders"),
    )];
    if !report.unreadable.is_empty() {
        lines.push("Unreadable notes".to_string());
        for path in &report.unreadable {
            lines.push(format!("    {path}"));
        }
    }
    if !report.dead_quick_links.is_empty() {
        lines.push("Quick links to missing notes".to_string());
        for path in &report.dead_quick_links {
            lines.push(format!("    {path}"));
        }
    }
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Search
// ============================================================================

pub fn format_search_output(query: &str, results: &[FlatEntry]) -> Vec<String> {
    if results.is_empty() {
        return vec![format!("No results for \"{query}\"")];
    }
    let mut lines = vec![format!("Results for \"{query}\" ({})", results.len())];
    for (i, entry) in results.iter().enumerate() {
        lines.push(entity_header(i + 1, &entry.name, None));
        lines.push(format!("    Source: {}", entry.path));
    }
    lines
}

pub fn print_search_output(query: &str, results: &[FlatEntry]) {
    for line in format_search_output(query, results) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::GeneratedPage;
    use crate::test_helpers::{find_entry, sample_manifest, setup_fixtures};

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn entity_header_counts() {
        assert_eq!(entity_header(1, "DevOps", Some(1)), "001 DevOps (1 note)");
        assert_eq!(entity_header(2, "DSA", Some(2)), "002 DSA (2 notes)");
        assert_eq!(entity_header(3, "Welcome", None), "003 Welcome");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    // =========================================================================
    // Scan
    // =========================================================================

    #[test]
    fn scan_output_lists_tree() {
        let tmp = setup_fixtures();
        let lines = format_scan_output(&sample_manifest(), tmp.path());
        assert_eq!(lines[0], "Notes");
        assert_eq!(lines[1], "001 DSA (2 notes)");
        assert_eq!(lines[2], "    001 README");
        assert_eq!(lines[3], "        Source: DSA/README.md");
        assert!(lines.contains(&"002 Database (3 notes)".to_string()));
        assert!(lines.contains(&"    002 NoSQL (2 notes)".to_string()));
        assert!(lines.contains(&"004 Welcome".to_string()));
        assert!(lines.contains(&"    Source: Welcome.md".to_string()));
    }

    #[test]
    fn scan_output_lists_config_files() {
        let tmp = setup_fixtures();
        let lines = format_scan_output(&sample_manifest(), tmp.path());
        assert_eq!(lines.last().map(String::as_str), Some("    config.toml"));
        assert!(!lines.contains(&"    manifest.json".to_string()));
    }

    // =========================================================================
    // Build
    // =========================================================================

    fn sample_result() -> GenerateResult {
        GenerateResult {
            pages: vec![GeneratedPage {
                title: "Arrays".to_string(),
                source: "DSA/Arrays.md".to_string(),
                output: "docs/DSA/Arrays/index.html".to_string(),
            }],
            folder_aliases: vec!["docs/DSA/index.html".to_string()],
            skipped: vec!["DevOps/Docker.md".to_string()],
            assets: vec!["assets/style.0123456789.css".to_string()],
            images_copied: 1,
        }
    }

    #[test]
    fn build_output() {
        let lines = format_build_output(&sample_result());
        assert_eq!(lines[0], "Home → index.html");
        assert_eq!(lines[1], "Not found → 404.html");
        assert_eq!(lines[2], "001 Arrays → docs/DSA/Arrays/index.html");
        assert_eq!(lines[3], "    Source: DSA/Arrays.md");
        assert!(lines.contains(&"Skipped (unreadable)".to_string()));
        assert!(lines.contains(&"    DevOps/Docker.md".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Generated 1 page, 1 folder page, 1 image"
        );
    }

    #[test]
    fn build_output_omits_empty_sections() {
        let lines = format_build_output(&GenerateResult::default());
        assert!(!lines.contains(&"Folders".to_string()));
        assert!(!lines.contains(&"Skipped (unreadable)".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Generated 0 pages, 0 folder pages, 0 images"
        );
    }

    // =========================================================================
    // Check and search
    // =========================================================================

    #[test]
    fn check_output() {
        let report = CheckReport {
            notes: 7,
            folders: 4,
            unreadable: vec![],
            dead_quick_links: vec!["Linux/Linux-Guide.md".to_string()],
        };
        assert_eq!(
            format_check_output(&report),
            vec![
                "7 notes in 4 folders",
                "Quick links to missing notes",
                "    Linux/Linux-Guide.md"
            ]
        );
    }

    #[test]
    fn search_output() {
        let manifest = sample_manifest();
        let redis = find_entry(&manifest, "Redis");
        assert_eq!(
            format_search_output("redis", &[redis]),
            vec![
                "Results for \"redis\" (1)",
                "001 Redis",
                "    Source: Database/NoSQL/Redis.md"
            ]
        );
        assert_eq!(format_search_output("zzz", &[]), vec!["No results for \"zzz\""]);
    }
}
