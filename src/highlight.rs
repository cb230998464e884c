//! Code block highlighting.
//!
//! Two engines sit behind the [`Highlighter`] trait:
//!
//! - [`SyntectHighlighter`]: grammar-based, emits `hljs-`-prefixed scope
//!   classes and generates matching CSS from a named syntect theme.
//! - [`BasicHighlighter`]: a small regex tokenizer for comments, strings,
//!   keywords, numbers and call-like identifiers. Used when the grammar engine
//!   recognizes neither the language nor the content.
//!
//! Both return HTML for the inside of a `<code>` element; the surrounding
//! `<pre><code class="hljs language-…">` is written by [`crate::markdown`].

use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};
use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;

use crate::config::{HighlightConfig, HighlightEngine};

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("Unknown highlight theme '{0}'")]
    UnknownTheme(String),
    #[error("Theme CSS generation failed: {0}")]
    Css(#[from] syntect::Error),
}

pub trait Highlighter: Send + Sync {
    /// Highlighted, HTML-escaped markup for a code block.
    ///
    /// `lang` is the fence annotation as written, possibly empty.
    fn highlight(&self, code: &str, lang: &str) -> String;

    /// Stylesheet for the classes this engine emits.
    fn css(&self) -> String;
}

/// Build the engine selected by configuration.
pub fn from_config(config: &HighlightConfig) -> Result<Arc<dyn Highlighter>, HighlightError> {
    Ok(match config.engine {
        HighlightEngine::Syntect => Arc::new(SyntectHighlighter::new(&config.theme)?),
        HighlightEngine::Basic => Arc::new(BasicHighlighter),
    })
}

/// Names of the themes bundled with syntect.
pub fn available_themes() -> Vec<String> {
    let mut names: Vec<String> = ThemeSet::load_defaults().themes.into_keys().collect();
    names.sort();
    names
}

// ============================================================================
// Grammar-based engine
// ============================================================================

pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    css: String,
}

impl SyntectHighlighter {
    pub fn new(theme_name: &str) -> Result<Self, HighlightError> {
        let themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .get(theme_name)
            .ok_or_else(|| HighlightError::UnknownTheme(theme_name.to_string()))?;
        let css = css_for_theme_with_class_style(theme, CLASS_STYLE)?;
        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            css,
        })
    }

    /// Syntax for a fence annotation: token, common aliases, then extension.
    fn find_syntax_for_language(&self, lang: &str) -> Option<&SyntaxReference> {
        let lang_lower = lang.to_lowercase();
        if let Some(syntax) = self.syntax_set.find_syntax_by_token(&lang_lower) {
            return Some(syntax);
        }

        let mapped = match lang_lower.as_str() {
            "rust" => "rs",
            "python" => "py",
            "javascript" | "jsx" | "node" => "js",
            "typescript" | "tsx" => "ts",
            "c++" | "cpp" => "cpp",
            "c#" | "csharp" => "cs",
            "shell" | "bash" | "zsh" | "console" => "sh",
            "yaml" => "yml",
            "markdown" => "md",
            "dockerfile" => "Dockerfile",
            "ruby" => "rb",
            other => other,
        };
        self.syntax_set
            .find_syntax_by_extension(mapped)
            .or_else(|| self.syntax_set.find_syntax_by_name(mapped))
    }

    fn render(&self, code: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            None
        } else {
            self.find_syntax_for_language(lang)
        };
        let syntax = syntax.or_else(|| {
            code.lines()
                .next()
                .and_then(|first| self.syntax_set.find_syntax_by_first_line(first))
        });

        match syntax {
            Some(syntax) => self.render(code, syntax).unwrap_or_else(|e| {
                tracing::debug!(lang, error = %e, "grammar highlighting failed, using basic");
                BasicHighlighter.highlight(code, lang)
            }),
            None => BasicHighlighter.highlight(code, lang),
        }
    }

    fn css(&self) -> String {
        format!("{}\n{}", self.css, BASIC_CSS)
    }
}

// ============================================================================
// Regex tokenizer
// ============================================================================

const KEYWORDS: &str = "abstract|await|break|case|catch|class|const|continue|debugger|default|delete|do|else|enum|export|extends|false|final|finally|for|from|function|get|goto|if|implements|import|in|instanceof|interface|let|new|null|package|private|protected|public|return|set|static|super|switch|synchronized|this|throw|throws|true|try|typeof|var|void|while|with|yield";

/// Comments and string literals. Nothing inside them is tokenized further.
static PROTECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)(?P<comment>(?s:/\*.*?\*/)|//.*$|#.*$)",
        r#"|(?P<string>`(?:\\.|[^`])*`|"(?:\\.|[^"])*"|'(?:\\.|[^'])*')"#,
    ))
    .unwrap()
});

/// Keywords, numbers and identifiers directly followed by `(`.
static TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?P<keyword>{KEYWORDS})\b|\b(?P<number>\d+(?:\.\d+)?)\b|\b(?P<title>[A-Za-z_]\w*)(?P<gap>\s*)\("
    ))
    .unwrap()
});

const BASIC_CSS: &str = "\
.hljs-comment { color: var(--hl-comment); font-style: italic; }
.hljs-string { color: var(--hl-string); }
.hljs-keyword { color: var(--hl-keyword); }
.hljs-number { color: var(--hl-number); }
.hljs-title { color: var(--hl-title); }
";

/// Regex tokenizer that works on any language, recognizing none in depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicHighlighter;

impl Highlighter for BasicHighlighter {
    fn highlight(&self, code: &str, _lang: &str) -> String {
        let escaped = escape_html(code);
        let mut out = String::with_capacity(escaped.len() * 2);
        let mut last = 0;
        for caps in PROTECTED.captures_iter(&escaped) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&highlight_tokens(&escaped[last..whole.start()]));
            let class = if caps.name("comment").is_some() {
                "hljs-comment"
            } else {
                "hljs-string"
            };
            out.push_str(&format!(r#"<span class="{class}">{}</span>"#, whole.as_str()));
            last = whole.end();
        }
        out.push_str(&highlight_tokens(&escaped[last..]));
        out
    }

    fn css(&self) -> String {
        BASIC_CSS.to_string()
    }
}

fn highlight_tokens(segment: &str) -> String {
    TOKENS
        .replace_all(segment, |caps: &Captures| {
            if let Some(m) = caps.name("keyword") {
                format!(r#"<span class="hljs-keyword">{}</span>"#, m.as_str())
            } else if let Some(m) = caps.name("number") {
                format!(r#"<span class="hljs-number">{}</span>"#, m.as_str())
            } else {
                let name = caps.name("title").map_or("", |m| m.as_str());
                let gap = caps.name("gap").map_or("", |m| m.as_str());
                format!(r#"<span class="hljs-title">{name}</span>{gap}("#)
            }
        })
        .into_owned()
}

/// Escape the three characters that matter inside element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
