//! Static site generation.
//!
//! Renders every note of the manifest, plus the home page, the 404 page, the
//! client search index and fingerprinted assets, into an output directory
//! that any static file server can host.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                     # Home: category cards + quick links
//! ├── 404.html                       # Served by hosts for unknown URLs
//! ├── search-index.json              # Flat note list for the search modal
//! ├── assets/
//! │   ├── style.<hash>.css           # Static CSS + palette + highlighter CSS
//! │   └── app.<hash>.js              # Client behavior
//! ├── images/                        # Copied verbatim from the docs root
//! └── docs/
//!     ├── DSA/
//!     │   ├── index.html             # Folder URL, same page as README
//!     │   ├── README/index.html
//!     │   └── Arrays/index.html
//!     └── ...
//! ```
//!
//! Notes render in parallel on the rayon pool. A note that cannot be read is
//! skipped and reported, never fatal; the page it would have produced 404s.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use sha2::{Digest, Sha256};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::{self, SiteConfig};
use crate::highlight::{HighlightError, Highlighter};
use crate::manifest::ManifestRoot;
use crate::markdown::MarkdownRenderer;
use crate::naming::slug_for_path;
use crate::page::{PageComposer, PageError};
use crate::prefs::UiPreferences;
use crate::search::SearchIndex;
use crate::templates::{self, AssetLinks, SiteContext};

pub const STYLE_CSS: &str = include_str!("../static/style.css");
pub const APP_JS: &str = include_str!("../static/app.js");

pub const INDEX_FILE: &str = "index.html";
pub const NOT_FOUND_FILE: &str = "404.html";
pub const SEARCH_INDEX_FILE: &str = "search-index.json";
pub const ASSETS_DIR: &str = "assets";
pub const IMAGES_DIR: &str = "images";
pub const DOCS_DIR: &str = "docs";

/// Hex digits of the content hash kept in asset file names.
const FINGERPRINT_LEN: usize = 10;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Highlighter error: {0}")]
    Highlight(#[from] HighlightError),
    #[error("Failed to copy images: {0}")]
    Walk(#[from] walkdir::Error),
}

/// The stylesheet and script, with content-hashed file names.
#[derive(Debug, Clone)]
pub struct SiteAssets {
    pub css: String,
    pub js: String,
    pub style_file: String,
    pub script_file: String,
}

impl SiteAssets {
    /// Assemble the stylesheet from the static CSS, the configured palette and
    /// sidebar bounds, and the highlighter's token styles.
    pub fn build(config: &SiteConfig, highlighter: &dyn Highlighter) -> Self {
        let css = [
            config::generate_color_css(&config.colors),
            config::generate_layout_css(&config.sidebar),
            STYLE_CSS.to_string(),
            highlighter.css(),
        ]
        .join("\n\n");
        let js = APP_JS.to_string();
        Self {
            style_file: format!("style.{}.css", fingerprint(&css)),
            script_file: format!("app.{}.js", fingerprint(&js)),
            css,
            js,
        }
    }

    pub fn links(&self) -> AssetLinks {
        AssetLinks {
            style: format!("/{ASSETS_DIR}/{}", self.style_file),
            script: format!("/{ASSETS_DIR}/{}", self.script_file),
        }
    }

    /// Content for a file name under `/assets/`, if it is one of ours.
    pub fn get(&self, file: &str) -> Option<(&str, &'static str)> {
        if file == self.style_file {
            Some((&self.css, "text/css; charset=utf-8"))
        } else if file == self.script_file {
            Some((&self.js, "text/javascript; charset=utf-8"))
        } else {
            None
        }
    }
}

/// Leading hex digits of the SHA-256 of `content`.
pub fn fingerprint(content: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(content.as_bytes()));
    digest[..FINGERPRINT_LEN].to_string()
}

/// One written note page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub title: String,
    /// Note path relative to the docs root.
    pub source: String,
    /// Written file relative to the output directory.
    pub output: String,
}

/// Everything `generate` wrote, for CLI output.
#[derive(Debug, Clone, Default)]
pub struct GenerateResult {
    pub pages: Vec<GeneratedPage>,
    /// Folder URLs that serve their README, as output-relative files.
    pub folder_aliases: Vec<String>,
    /// Notes listed in the manifest that could not be rendered.
    pub skipped: Vec<String>,
    pub assets: Vec<String>,
    pub images_copied: usize,
}

enum Rendered {
    Page(GeneratedPage),
    Skipped(String),
}

/// Build the whole site into `output_dir`.
pub fn generate(
    docs_root: &Path,
    manifest: &ManifestRoot,
    config: &SiteConfig,
    prefs: &UiPreferences,
    output_dir: &Path,
) -> Result<GenerateResult, GenerateError> {
    let renderer = MarkdownRenderer::from_config(config)?;
    let assets = SiteAssets::build(config, renderer.highlighter());
    let links = assets.links();
    let composer = PageComposer::new(manifest, &renderer, docs_root);
    let ctx = SiteContext {
        config,
        manifest,
        prefs,
        assets: &links,
    };

    fs::create_dir_all(output_dir)?;
    let mut result = GenerateResult::default();

    let assets_dir = output_dir.join(ASSETS_DIR);
    fs::create_dir_all(&assets_dir)?;
    fs::write(assets_dir.join(&assets.style_file), &assets.css)?;
    fs::write(assets_dir.join(&assets.script_file), &assets.js)?;
    result.assets = vec![
        format!("{ASSETS_DIR}/{}", assets.style_file),
        format!("{ASSETS_DIR}/{}", assets.script_file),
    ];

    let rendered = manifest
        .entries()
        .par_iter()
        .map(|entry| {
            let slug = slug_for_path(&entry.path);
            match composer.resolve_slug(slug) {
                Ok(composed) => {
                    let output = page_file(slug);
                    write_file(
                        output_dir,
                        &output,
                        &templates::render_doc_page(&ctx, &composed).into_string(),
                    )?;
                    Ok(Rendered::Page(GeneratedPage {
                        title: composed.page.title,
                        source: entry.path.clone(),
                        output,
                    }))
                }
                Err(PageError::NotFound(_)) => {
                    tracing::warn!(path = %entry.path, "skipping unreadable note");
                    Ok(Rendered::Skipped(entry.path.clone()))
                }
            }
        })
        .collect::<Result<Vec<_>, GenerateError>>()?;

    for item in rendered {
        match item {
            Rendered::Page(page) => result.pages.push(page),
            Rendered::Skipped(path) => result.skipped.push(path),
        }
    }

    for id in manifest.folder_ids() {
        let parts: Vec<&str> = id.split('/').collect();
        if let Ok(composed) = composer.resolve(&parts) {
            let output = page_file(&id);
            write_file(
                output_dir,
                &output,
                &templates::render_doc_page(&ctx, &composed).into_string(),
            )?;
            result.folder_aliases.push(output);
        }
    }

    let home = composer.home(config);
    write_file(
        output_dir,
        INDEX_FILE,
        &templates::render_home(&ctx, &home).into_string(),
    )?;
    write_file(
        output_dir,
        NOT_FOUND_FILE,
        &templates::render_not_found(&ctx).into_string(),
    )?;

    let index = SearchIndex::new(manifest, config.search.max_results);
    write_file(output_dir, SEARCH_INDEX_FILE, &index.to_json()?)?;

    result.images_copied = copy_images(docs_root, output_dir)?;

    tracing::info!(
        pages = result.pages.len(),
        skipped = result.skipped.len(),
        output = %output_dir.display(),
        "site generated"
    );
    Ok(result)
}

/// Problems found by [`check`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub notes: usize,
    pub folders: usize,
    /// Manifest notes that cannot be read.
    pub unreadable: Vec<String>,
    /// Configured quick links whose note is not in the manifest.
    pub dead_quick_links: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.unreadable.is_empty() && self.dead_quick_links.is_empty()
    }
}

/// Render every note in memory and report what a build would skip.
pub fn check(
    docs_root: &Path,
    manifest: &ManifestRoot,
    config: &SiteConfig,
) -> Result<CheckReport, GenerateError> {
    let renderer = MarkdownRenderer::from_config(config)?;
    let composer = PageComposer::new(manifest, &renderer, docs_root);

    let unreadable = manifest
        .entries()
        .par_iter()
        .filter(|entry| composer.resolve_slug(slug_for_path(&entry.path)).is_err())
        .map(|entry| entry.path.clone())
        .collect();
    let dead_quick_links = config
        .quick_links
        .iter()
        .filter(|link| manifest.find_file(&link.path).is_none())
        .map(|link| link.path.clone())
        .collect();

    Ok(CheckReport {
        notes: manifest.file_count(),
        folders: manifest.folder_ids().len(),
        unreadable,
        dead_quick_links,
    })
}

/// Output-relative file for a slug: `docs/<slug>/index.html`.
pub fn page_file(slug: &str) -> String {
    format!("{DOCS_DIR}/{slug}/{INDEX_FILE}")
}

fn write_file(output_dir: &Path, relative: &str, content: &str) -> Result<(), GenerateError> {
    let path: PathBuf = relative
        .split('/')
        .fold(output_dir.to_path_buf(), |acc, part| acc.join(part));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Mirror `<docs_root>/images` into `<output>/images`. Returns files copied.
fn copy_images(docs_root: &Path, output_dir: &Path) -> Result<usize, GenerateError> {
    let src = docs_root.join(IMAGES_DIR);
    if !src.is_dir() {
        return Ok(0);
    }
    let dst = output_dir.join(IMAGES_DIR);
    let mut copied = 0;
    for entry in WalkDir::new(&src) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(&src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Tests
// ============================================================================
