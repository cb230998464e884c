//! Note search and the quick-open dialog.
//!
//! Search is a case-insensitive substring match against each note's name and
//! content path, in manifest order, capped at a configured limit. The same
//! rules run server-side (`/api/search`, `nano-ink search`) and in the
//! browser over `search-index.json`.

use serde::Serialize;

use crate::manifest::{FlatEntry, ManifestRoot};
use crate::naming::href_for_path;

/// Notes matching `query`, in flatten order, at most `limit` of them.
///
/// A blank query matches nothing. Otherwise the query is matched as typed,
/// surrounding whitespace included.
pub fn search(query: &str, entries: &[FlatEntry], limit: usize) -> Vec<FlatEntry> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();
    entries
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&query) || e.path.to_lowercase().contains(&query))
        .take(limit)
        .cloned()
        .collect()
}

/// One search result as served to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub name: String,
    pub path: String,
    pub parent_path: String,
    pub href: String,
}

impl From<FlatEntry> for SearchHit {
    fn from(entry: FlatEntry) -> Self {
        Self {
            href: href_for_path(&entry.path),
            name: entry.name,
            path: entry.path,
            parent_path: entry.parent_path,
        }
    }
}

/// Flattened notes plus the result limit.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<FlatEntry>,
    max_results: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexDocument {
    max_results: usize,
    entries: Vec<SearchHit>,
}

impl SearchIndex {
    pub fn new(root: &ManifestRoot, max_results: usize) -> Self {
        Self {
            entries: root.entries(),
            max_results,
        }
    }

    pub fn entries(&self) -> &[FlatEntry] {
        &self.entries
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn query(&self, query: &str) -> Vec<FlatEntry> {
        search(query, &self.entries, self.max_results)
    }

    /// Results with their page URLs, for JSON responses.
    pub fn hits(&self, query: &str) -> Vec<SearchHit> {
        self.query(query).into_iter().map(SearchHit::from).collect()
    }

    /// The whole index for the client script.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&IndexDocument {
            max_results: self.max_results,
            entries: self.entries.iter().cloned().map(SearchHit::from).collect(),
        })
    }
}

/// Keys the quick-open dialog reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// Keyboard state of the quick-open (Ctrl/Cmd+K) dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QuickOpen {
    #[default]
    Closed,
    Open {
        query: String,
        results: Vec<FlatEntry>,
        selected: usize,
    },
}

impl QuickOpen {
    /// Open with an empty query, discarding anything from a previous session.
    pub fn open(&mut self) {
        *self = QuickOpen::Open {
            query: String::new(),
            results: Vec::new(),
            selected: 0,
        };
    }

    pub fn close(&mut self) {
        *self = QuickOpen::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, QuickOpen::Open { .. })
    }

    /// Replace the query and results. Selection returns to the first result.
    pub fn set_query(&mut self, index: &SearchIndex, new_query: &str) {
        if let QuickOpen::Open {
            query,
            results,
            selected,
        } = self
        {
            *query = new_query.to_string();
            *results = index.query(new_query);
            *selected = 0;
        }
    }

    pub fn selected(&self) -> Option<&FlatEntry> {
        match self {
            QuickOpen::Open {
                results, selected, ..
            } => results.get(*selected),
            QuickOpen::Closed => None,
        }
    }

    /// Apply a key press. Enter on a result returns its URL and closes.
    pub fn key(&mut self, key: Key) -> Option<String> {
        match key {
            Key::Escape => {
                self.close();
                None
            }
            Key::Enter => {
                let href = self.selected().map(|e| href_for_path(&e.path))?;
                self.close();
                Some(href)
            }
            Key::ArrowDown | Key::ArrowUp => {
                if let QuickOpen::Open {
                    results, selected, ..
                } = self
                {
                    *selected = match key {
                        Key::ArrowDown => (*selected + 1).min(results.len().saturating_sub(1)),
                        _ => selected.saturating_sub(1),
                    };
                }
                None
            }
        }
    }
}
