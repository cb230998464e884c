//! Shared types produced by the rendering core.
//!
//! These are serialized as-is by the `/api/pages` endpoint, so field names
//! follow the JSON shape the client script reads.

use serde::{Deserialize, Serialize};

/// Body of the page returned when a note cannot be read.
pub const ERROR_CONTENT: &str = "<p>Could not load this note.</p>";
/// Title of the page returned when a note cannot be read.
pub const ERROR_TITLE: &str = "Error";

/// One entry of a page's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor id, unique within one rendered page.
    pub id: String,
    pub text: String,
    /// 1 to 4; deeper headings get ids but are not listed.
    pub level: u8,
}

/// A markdown note converted to HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub content: String,
    pub title: String,
    pub headings: Vec<Heading>,
}

impl RenderedPage {
    /// The page shown in place of a note that could not be read.
    pub fn error() -> Self {
        Self {
            content: ERROR_CONTENT.to_string(),
            title: ERROR_TITLE.to_string(),
            headings: Vec::new(),
        }
    }

    /// Whether this is the unreadable-note page.
    ///
    /// The page composer treats this as "not found".
    pub fn is_error(&self) -> bool {
        self.content == ERROR_CONTENT
    }
}
