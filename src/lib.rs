//! # Nano Ink
//!
//! A markdown knowledge base. A directory of notes becomes a site with a
//! collapsible folder sidebar, a table of contents per note and a search
//! modal, either written out as static files or served over HTTP.
//!
//! # Architecture: One Core, Two Entry Points
//!
//! ```text
//! docs/ → scan → manifest ─┬→ nav     (sidebar tree)
//!                          ├→ search  (flat index)
//!                          └→ page    (slug → note) → markdown → templates
//!
//! templates → generate → dist/   (nano-ink build)
//! templates → server   → HTTP    (nano-ink serve)
//! ```
//!
//! The manifest is built once, then only read. Everything downstream is a
//! pure function of the manifest, the configuration and one note's markdown,
//! so `build` and `serve` produce byte-identical pages for the same input.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`manifest`] | Folder/note tree: flatten, count, find |
//! | [`scan`] | Builds the manifest from `manifest.json` or the directory tree |
//! | [`markdown`] | Note rendering: heading ids, TOC, code blocks, image paths |
//! | [`highlight`] | Code highlighting: syntect, or a regex fallback |
//! | [`nav`] | Sidebar collapse state, filtering and tree markup |
//! | [`prefs`] | Theme, sidebar width and collapsed folders over a key-value store |
//! | [`search`] | Substring search and the quick-open keyboard state |
//! | [`page`] | Slug resolution, README substitution, breadcrumbs, home page data |
//! | [`templates`] | Maud page templates |
//! | [`generate`] | Static site output |
//! | [`server`] | axum router |
//! | [`config`] | `config.toml` loading, validation and CSS generation |
//! | [`naming`] | Path/slug/URL conventions and category names |
//! | [`types`] | Rendered page types shared by the pipeline |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Paths Are the Identity
//!
//! A note is addressed by its path relative to the docs root (`DSA/Arrays.md`).
//! Its URL is the path without `.md` under `/docs/`, and a folder URL serves
//! the folder's `README`. No front-matter, no ids, no database.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): templates are
//! checked at compile time and interpolation is escaped. Only rendered note
//! HTML goes in unescaped.
//!
//! ## Static First
//!
//! The client script works against the static output: in-page navigation
//! fetches the next page's HTML, search reads `search-index.json`. The server
//! answers the same URLs, so the same script runs in both modes.

pub mod config;
pub mod generate;
pub mod highlight;
pub mod manifest;
pub mod markdown;
pub mod naming;
pub mod nav;
pub mod output;
pub mod page;
pub mod prefs;
pub mod scan;
pub mod search;
pub mod server;
pub mod templates;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
