//! Markdown to HTML rendering.
//!
//! One pulldown-cmark pass turns a note into a [`RenderedPage`]:
//!
//! - every heading gets a unique `id`; levels 1 to 4 are collected for the
//!   table of contents in the same pass, so `#` lines inside code blocks are
//!   never mistaken for headings
//! - fenced and indented code blocks go through the configured
//!   [`Highlighter`]
//! - relative image sources are rewritten to site-absolute `/images/…` URLs
//! - soft line breaks become `<br />` when hard breaks are enabled
//!
//! The title comes from the raw text: the first `# Title` line, else the file
//! name.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};
use regex::Regex;

use crate::config::SiteConfig;
use crate::highlight::{self, HighlightError, Highlighter};
use crate::naming::fallback_title;
use crate::types::{Heading, RenderedPage};

/// Deepest heading level listed in the table of contents.
pub const MAX_TOC_LEVEL: u8 = 4;

static TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+)$").unwrap());

/// Renders notes with a fixed highlighter and break policy.
///
/// Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct MarkdownRenderer {
    highlighter: Arc<dyn Highlighter>,
    hard_breaks: bool,
}

impl MarkdownRenderer {
    pub fn new(highlighter: Arc<dyn Highlighter>, hard_breaks: bool) -> Self {
        Self {
            highlighter,
            hard_breaks,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, HighlightError> {
        let highlighter = highlight::from_config(&config.highlight)?;
        Ok(Self::new(highlighter, config.markdown.hard_breaks))
    }

    pub fn highlighter(&self) -> &dyn Highlighter {
        self.highlighter.as_ref()
    }

    /// Read a note from the docs root and render it.
    ///
    /// A note that cannot be read renders as [`RenderedPage::error`]; this
    /// never fails.
    pub fn render_file(&self, docs_root: &Path, path: &str) -> RenderedPage {
        match fs::read_to_string(docs_root.join(path)) {
            Ok(raw) => self.render(&raw, path),
            Err(e) => {
                tracing::warn!(path, error = %e, "could not read note");
                RenderedPage::error()
            }
        }
    }

    /// Render raw markdown. `file_path` only feeds the fallback title.
    pub fn render(&self, raw: &str, file_path: &str) -> RenderedPage {
        let title = extract_title(raw)
            .or_else(|| fallback_title(file_path))
            .unwrap_or_else(|| "Untitled".to_string());

        let (events, headings) = self.transform(raw);
        let mut content = String::with_capacity(raw.len() * 3 / 2);
        md_html::push_html(&mut content, events.into_iter());

        RenderedPage {
            content,
            title,
            headings,
        }
    }

    fn transform<'a>(&self, raw: &'a str) -> (Vec<Event<'a>>, Vec<Heading>) {
        let mut events: Vec<Event<'a>> = Vec::new();
        let mut headings = Vec::new();
        let mut ids = HeadingIds::default();

        // Open heading: index of its start event and its plain text so far.
        let mut heading: Option<(usize, String)> = None;
        // Open code block: language and source so far.
        let mut code: Option<(String, String)> = None;

        for event in Parser::new_ext(raw, markdown_options()) {
            if code.is_some() {
                match event {
                    Event::Text(text) => {
                        if let Some((_, source)) = code.as_mut() {
                            source.push_str(&text);
                        }
                    }
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((lang, source)) = code.take() {
                            events.push(Event::Html(self.code_block(&source, &lang).into()));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().unwrap_or("").to_string()
                        }
                        CodeBlockKind::Indented => String::new(),
                    };
                    code = Some((lang, String::new()));
                }
                Event::Start(Tag::Heading { .. }) => {
                    heading = Some((events.len(), String::new()));
                    events.push(event);
                }
                Event::End(TagEnd::Heading(level)) => {
                    if let Some((start, text)) = heading.take() {
                        let text = text.trim().to_string();
                        let id = ids.assign(&slugify(&text));
                        if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[start] {
                            *slot = Some(CowStr::from(id.clone()));
                        }
                        let level = level as u8;
                        if level <= MAX_TOC_LEVEL {
                            headings.push(Heading { id, text, level });
                        }
                    }
                    events.push(event);
                }
                Event::Text(ref text) | Event::Code(ref text) => {
                    if let Some((_, buf)) = heading.as_mut() {
                        buf.push_str(text);
                    }
                    events.push(event);
                }
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    events.push(Event::Start(Tag::Image {
                        link_type,
                        dest_url: normalize_image_src(&dest_url).into(),
                        title,
                        id,
                    }));
                }
                Event::SoftBreak if self.hard_breaks => events.push(Event::HardBreak),
                other => events.push(other),
            }
        }

        (events, headings)
    }

    fn code_block(&self, source: &str, lang: &str) -> String {
        format!(
            r#"<pre><code class="hljs language-{}">{}</code></pre>"#,
            escape_attr(lang),
            self.highlighter.highlight(source, lang)
        )
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// First `# Title` line of the raw text, trimmed.
pub fn extract_title(raw: &str) -> Option<String> {
    TITLE_LINE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Anchor slug for heading text.
///
/// Lowercased, stripped to word characters, whitespace and hyphens, with
/// whitespace runs collapsed to one hyphen.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Hands out page-unique ids: repeats of a slug get `-1`, `-2`, ….
#[derive(Default)]
struct HeadingIds {
    counts: HashMap<String, usize>,
    used: HashSet<String>,
}

impl HeadingIds {
    fn assign(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        while self.used.contains(&candidate) {
            let n = self.counts.entry(base.to_string()).or_insert(0);
            *n += 1;
            candidate = format!("{base}-{n}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Map a note-relative image source to a site URL.
///
/// Absolute sources (`http://`, `https://`, `data:`, leading `/`) pass
/// through. Otherwise leading `../` runs and one `./` are dropped, and
/// `images/…` gains a leading `/`.
pub fn normalize_image_src(href: &str) -> String {
    let trimmed = href.trim();
    if ["http://", "https://", "data:", "/"]
        .iter()
        .any(|p| trimmed.starts_with(p))
    {
        return trimmed.to_string();
    }

    let mut normalized = trimmed;
    while let Some(rest) = normalized.strip_prefix("../") {
        normalized = rest;
    }
    if let Some(rest) = normalized.strip_prefix("./") {
        normalized = rest;
    }

    if normalized.starts_with("images/") {
        format!("/{normalized}")
    } else {
        normalized.to_string()
    }
}

fn escape_attr(value: &str) -> String {
    highlight::escape_html(value).replace('"', "&quot;")
}
