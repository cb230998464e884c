//! Page composition: URL slug to rendered page.
//!
//! A slug is the URL path under `/docs/` split on `/`. Resolution:
//!
//! 1. The segments are looked up in the manifest by name. A folder is
//!    replaced by its `README` note (once; a README is never chased further).
//! 2. The target must end up a note.
//! 3. The note is rendered; an unreadable note is a miss too.
//!
//! Misses are [`PageError::NotFound`], which both entry points turn into the
//! 404 page.

use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::manifest::{ManifestNode, ManifestRoot, count_files, format_category_name};
use crate::markdown::MarkdownRenderer;
use crate::naming::{
    fallback_title, href_for_folder, href_for_path, slug_for_path, slug_segments,
};
use crate::types::{Heading, RenderedPage};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PageError {
    #[error("No note at /{0}")]
    NotFound(String),
}

/// One clickable step of a breadcrumb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub ancestors: Vec<Crumb>,
    /// Final segment, shown without a link.
    pub current: String,
}

impl Breadcrumb {
    /// Ancestors are every requested segment but the last; `current` names the
    /// note actually shown, so a folder URL ends in its README.
    fn new(manifest: &ManifestRoot, requested: &[&str], current: String) -> Self {
        let parents = requested.split_last().map_or(&[][..], |(_, parents)| parents);
        let ancestors = (1..=parents.len())
            .map(|end| {
                let chain = &parents[..end];
                Crumb {
                    label: chain[end - 1].to_string(),
                    href: manifest
                        .find_folder(chain)
                        .map(|folder| folder_href(folder, chain))
                        .unwrap_or_else(|| href_for_folder(chain)),
                }
            })
            .collect();
        Self { ancestors, current }
    }
}

/// A resolved note ready for the page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPage {
    /// Slug after README substitution, `/`-joined.
    pub slug: String,
    pub file_path: String,
    pub breadcrumb: Breadcrumb,
    pub page: RenderedPage,
}

/// A category card on the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCard {
    pub name: String,
    pub label: String,
    pub note_count: usize,
    pub href: String,
}

impl CategoryCard {
    /// "1 note" / "N notes".
    pub fn count_label(&self) -> String {
        match self.note_count {
            1 => "1 note".to_string(),
            n => format!("{n} notes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickLinkCard {
    pub label: String,
    pub emoji: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePage {
    pub categories: Vec<CategoryCard>,
    pub quick_links: Vec<QuickLinkCard>,
}

/// One note with its rendering, as served by `/api/pages`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub name: String,
    pub path: String,
    pub parent_path: String,
    pub title: String,
    pub content: String,
    pub headings: Vec<Heading>,
}

pub struct PageComposer<'a> {
    manifest: &'a ManifestRoot,
    renderer: &'a MarkdownRenderer,
    docs_root: &'a Path,
}

impl<'a> PageComposer<'a> {
    pub fn new(manifest: &'a ManifestRoot, renderer: &'a MarkdownRenderer, docs_root: &'a Path) -> Self {
        Self {
            manifest,
            renderer,
            docs_root,
        }
    }

    /// Resolve a `/`-separated slug, ignoring empty segments.
    pub fn resolve_slug(&self, slug: &str) -> Result<ComposedPage, PageError> {
        self.resolve(&slug_segments(slug))
    }

    pub fn resolve(&self, parts: &[&str]) -> Result<ComposedPage, PageError> {
        let not_found = || PageError::NotFound(parts.join("/"));
        if parts.is_empty() {
            return Err(not_found());
        }

        let target = self.manifest.find(parts).ok_or_else(not_found)?;
        let note = match target {
            ManifestNode::Folder { .. } => target.readme(),
            ManifestNode::File { .. } => Some(target),
        };
        let file_path = note
            .and_then(ManifestNode::path)
            .ok_or_else(not_found)?
            .to_string();

        let page = self.renderer.render_file(self.docs_root, &file_path);
        if page.is_error() {
            return Err(not_found());
        }

        let current = fallback_title(&file_path).unwrap_or_else(|| parts.join("/"));
        Ok(ComposedPage {
            slug: slug_for_path(&file_path).to_string(),
            breadcrumb: Breadcrumb::new(self.manifest, parts, current),
            file_path,
            page,
        })
    }

    /// Category cards for top-level folders plus the configured quick links
    /// that point at existing notes.
    pub fn home(&self, config: &SiteConfig) -> HomePage {
        let categories = self
            .manifest
            .children
            .iter()
            .filter(|node| node.is_folder())
            .map(|node| CategoryCard {
                name: node.name().to_string(),
                label: format_category_name(node.name()),
                note_count: count_files(node),
                href: category_href(node),
            })
            .collect();

        let quick_links = config
            .quick_links
            .iter()
            .filter(|link| {
                let exists = self.manifest.find_file(&link.path).is_some();
                if !exists {
                    tracing::debug!(path = %link.path, "skipping quick link to missing note");
                }
                exists
            })
            .map(|link| QuickLinkCard {
                label: link.label.clone(),
                emoji: link.emoji.clone(),
                href: href_for_path(&link.path),
            })
            .collect();

        HomePage {
            categories,
            quick_links,
        }
    }

    /// Every note rendered, in flatten order.
    pub fn all_pages(&self) -> Vec<PageRecord> {
        self.manifest
            .entries()
            .into_par_iter()
            .map(|entry| {
                let page = self.renderer.render_file(self.docs_root, &entry.path);
                PageRecord {
                    name: entry.name,
                    path: entry.path,
                    parent_path: entry.parent_path,
                    title: page.title,
                    content: page.content,
                    headings: page.headings,
                }
            })
            .collect()
    }
}

/// Card target: the folder's README, else its first note, else the folder URL.
fn category_href(folder: &ManifestNode) -> String {
    folder
        .readme()
        .or_else(|| folder.first_note())
        .and_then(|n| n.path())
        .map(href_for_path)
        .unwrap_or_else(|| href_for_folder(&[folder.name()]))
}

/// Breadcrumb target for a folder: its own URL when a README stands in for
/// it, else the first note under it.
fn folder_href(folder: &ManifestNode, chain: &[&str]) -> String {
    if folder.readme().is_some() {
        return href_for_folder(chain);
    }
    folder
        .first_note()
        .and_then(ManifestNode::path)
        .map(href_for_path)
        .unwrap_or_else(|| href_for_folder(chain))
}
