//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the docs root overrides any subset of
//! them.
//!
//! ## Config File Location
//!
//! ```text
//! docs/
//! ├── config.toml              # Overrides stock defaults
//! ├── DSA/
//! │   └── ...
//! └── Welcome.md
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Nano Ink"
//! tagline = "Welcome to Learning Hub"
//! description = "Your personal knowledge base for Computer Science & Software Engineering"
//!
//! [markdown]
//! hard_breaks = true        # Single newlines become <br />
//!
//! [highlight]
//! engine = "syntect"        # "syntect" or "basic"
//! theme = "base16-ocean.dark"
//!
//! [search]
//! max_results = 10
//!
//! [sidebar]
//! min_width = 180           # Pixels
//! max_width = 500
//! default_width = 280
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//!
//! [[quick_links]]
//! label = "Linux Guide"
//! path = "Linux/Linux-Guide.md"
//! emoji = "🐧"
//! ```
//!
//! `[colors.light]` and `[colors.dark]` set the palette for each theme.
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [search]
//! max_results = 5
//! ```
//!
//! Unknown keys are rejected to catch typos early. Arrays (such as
//! `quick_links`) replace the default list rather than extending it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::highlight;
use crate::naming::MARKDOWN_EXT;

/// File name of the site configuration in the docs root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity shown in the header and on the home page.
    pub site: SiteInfo,
    /// Markdown rendering options.
    pub markdown: MarkdownConfig,
    /// Code block highlighting.
    pub highlight: HighlightConfig,
    /// Search result limits.
    pub search: SearchConfig,
    /// Sidebar width bounds.
    pub sidebar: SidebarConfig,
    /// Color schemes for light and dark themes.
    pub colors: ColorConfig,
    /// Bind address for `serve`.
    pub server: ServerConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
    /// Shortcuts shown on the home page.
    pub quick_links: Vec<QuickLink>,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::Validation(
                "search.max_results must be at least 1".into(),
            ));
        }
        let sidebar = &self.sidebar;
        if sidebar.min_width == 0 || sidebar.min_width > sidebar.max_width {
            return Err(ConfigError::Validation(
                "sidebar.min_width must be non-zero and not exceed sidebar.max_width".into(),
            ));
        }
        if !(sidebar.min_width..=sidebar.max_width).contains(&sidebar.default_width) {
            return Err(ConfigError::Validation(
                "sidebar.default_width must be between sidebar.min_width and sidebar.max_width"
                    .into(),
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation("server.host must not be empty".into()));
        }
        if self.highlight.engine == HighlightEngine::Syntect {
            let themes = highlight::available_themes();
            if !themes.contains(&self.highlight.theme) {
                return Err(ConfigError::Validation(format!(
                    "highlight.theme '{}' is not one of: {}",
                    self.highlight.theme,
                    themes.join(", ")
                )));
            }
        }
        if let Some(link) = self
            .quick_links
            .iter()
            .find(|l| !l.path.ends_with(MARKDOWN_EXT))
        {
            return Err(ConfigError::Validation(format!(
                "quick_links path '{}' must point at a {MARKDOWN_EXT} note",
                link.path
            )));
        }
        Ok(())
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Name shown in the header and the document title.
    pub title: String,
    /// Home page heading.
    pub tagline: String,
    /// Home page subheading.
    pub description: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Nano Ink".to_string(),
            tagline: "Welcome to Learning Hub".to_string(),
            description:
                "Your personal knowledge base for Computer Science & Software Engineering"
                    .to_string(),
        }
    }
}

/// Markdown rendering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// Render single newlines inside paragraphs as `<br />`.
    pub hard_breaks: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { hard_breaks: true }
    }
}

/// Which engine highlights code blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightEngine {
    /// Grammar-based highlighting with a named theme.
    Syntect,
    /// Regex tokenizer only.
    Basic,
}

/// Code block highlighting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    pub engine: HighlightEngine,
    /// Bundled syntect theme used to generate the highlight stylesheet.
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            engine: HighlightEngine::Syntect,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Most results returned for one query.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results: 10 }
    }
}

/// Sidebar width bounds, in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarConfig {
    pub min_width: u32,
    pub max_width: u32,
    pub default_width: u32,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            min_width: 180,
            max_width: 500,
            default_width: 280,
        }
    }
}

impl SidebarConfig {
    /// Clamp a width into `[min_width, max_width]`.
    pub fn clamp(&self, width: u32) -> u32 {
        width.clamp(self.min_width, self.max_width)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page rendering workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// A home page shortcut to a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuickLink {
    pub label: String,
    /// Content path of the target note.
    pub path: String,
    #[serde(default)]
    pub emoji: String,
}

fn default_quick_links() -> Vec<QuickLink> {
    [
        ("Data Structures & Algorithms", "DSA/README.md", "🚀"),
        ("Linux Guide", "Linux/Linux-Guide.md", "🐧"),
        ("Docker Basics", "DevOps/Docker.md", "🐳"),
        ("JavaScript", "WebDev/JavaScript.md", "⚡"),
    ]
    .into_iter()
    .map(|(label, path, emoji)| QuickLink {
        label: label.to_string(),
        path: path.to_string(),
        emoji: emoji.to_string(),
    })
    .collect()
}

/// Color configuration for light and dark themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light theme color scheme.
    pub light: ColorScheme,
    /// Dark theme color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Sidebar, cards and modal background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (breadcrumbs, counts, TOC).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Links, active items and focus rings.
    pub accent: String,
    /// Code block background.
    pub code_background: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f5f5f5".to_string(),
            text: "#171717".to_string(),
            text_muted: "#525252".to_string(),
            border: "#e5e5e5".to_string(),
            accent: "#2563eb".to_string(),
            code_background: "#f6f8fa".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            surface: "#171717".to_string(),
            text: "#e5e5e5".to_string(),
            text_muted: "#a3a3a3".to_string(),
            border: "#262626".to_string(),
            accent: "#60a5fa".to_string(),
            code_background: "#111111".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_dark()
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteInfo::default(),
            markdown: MarkdownConfig::default(),
            highlight: HighlightConfig::default(),
            search: SearchConfig::default(),
            sidebar: SidebarConfig::default(),
            colors: ColorConfig::default(),
            server: ServerConfig::default(),
            processing: ProcessingConfig::default(),
            quick_links: default_quick_links(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a TOML table, the layer `config.toml` is merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Merge `overlay` onto `base`.
///
/// Sections merge key by key, so `[colors.dark] accent = "..."` keeps the
/// rest of the dark palette. Any other value, `quick_links` included,
/// replaces the base value outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                let merged = match table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                table.insert(key, merged);
            }
            toml::Value::Table(table)
        }
        (_, value) => value,
    }
}

/// The docs root's `config.toml` as raw TOML, or `None` when there is none.
pub fn read_overrides(docs_root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = docs_root.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(toml::from_str(&fs::read_to_string(&path)?)?))
}

/// Stock defaults with `overrides` merged on top, deserialized and validated.
pub fn apply_overrides(overrides: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let value = match overrides {
        Some(overrides) => merge_toml(stock_defaults_value(), overrides),
        None => stock_defaults_value(),
    };
    let config: SiteConfig = value.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site configuration for a docs root.
pub fn load_config(docs_root: &Path) -> Result<SiteConfig, ConfigError> {
    apply_overrides(read_overrides(docs_root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Nano Ink Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the docs root as config.toml.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Shown in the header and in every page title.
title = "Nano Ink"
# Home page heading and subheading.
tagline = "Welcome to Learning Hub"
description = "Your personal knowledge base for Computer Science & Software Engineering"

# ---------------------------------------------------------------------------
# Markdown
# ---------------------------------------------------------------------------
[markdown]
# Render single newlines inside a paragraph as line breaks.
hard_breaks = true

# ---------------------------------------------------------------------------
# Code highlighting
# ---------------------------------------------------------------------------
[highlight]
# "syntect" for grammar-based highlighting, "basic" for the regex tokenizer.
engine = "syntect"
# Any bundled syntect theme, e.g. "InspiredGitHub", "Solarized (dark)".
theme = "base16-ocean.dark"

# ---------------------------------------------------------------------------
# Search
# ---------------------------------------------------------------------------
[search]
# Most results shown for one query.
max_results = 10

# ---------------------------------------------------------------------------
# Sidebar (pixels)
# ---------------------------------------------------------------------------
[sidebar]
min_width = 180
max_width = 500
default_width = 280

# ---------------------------------------------------------------------------
# Colors - Light theme
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
surface = "#f5f5f5"         # Sidebar, cards, search modal
text = "#171717"
text_muted = "#525252"      # Breadcrumbs, counts, table of contents
border = "#e5e5e5"
accent = "#2563eb"          # Links and active items
code_background = "#f6f8fa"

# ---------------------------------------------------------------------------
# Colors - Dark theme (the default theme)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
surface = "#171717"
text = "#e5e5e5"
text_muted = "#a3a3a3"
border = "#262626"
accent = "#60a5fa"
code_background = "#111111"

# ---------------------------------------------------------------------------
# Server (nano-ink serve)
# ---------------------------------------------------------------------------
[server]
host = "127.0.0.1"
port = 3000

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-rendering workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Home page quick links
# ---------------------------------------------------------------------------
# Defining any [[quick_links]] replaces this whole list.
[[quick_links]]
label = "Data Structures & Algorithms"
path = "DSA/README.md"
emoji = "🚀"

[[quick_links]]
label = "Linux Guide"
path = "Linux/Linux-Guide.md"
emoji = "🐧"

[[quick_links]]
label = "Docker Basics"
path = "DevOps/Docker.md"
emoji = "🐳"

[[quick_links]]
label = "JavaScript"
path = "WebDev/JavaScript.md"
emoji = "⚡"
"##
}

/// Generate CSS custom properties from color config.
///
/// Dark is the default; the light palette applies under `data-theme="light"`.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root,
[data-theme="dark"] {{
{dark}
}}

[data-theme="light"] {{
{light}
}}"#,
        dark = scheme_variables(&colors.dark),
        light = scheme_variables(&colors.light),
    )
}

fn scheme_variables(scheme: &ColorScheme) -> String {
    format!(
        "    --color-bg: {};\n    --color-surface: {};\n    --color-text: {};\n    --color-text-muted: {};\n    --color-border: {};\n    --color-accent: {};\n    --color-code-bg: {};",
        scheme.background,
        scheme.surface,
        scheme.text,
        scheme.text_muted,
        scheme.border,
        scheme.accent,
        scheme.code_background,
    )
}

/// Generate CSS custom properties from sidebar config.
pub fn generate_layout_css(sidebar: &SidebarConfig) -> String {
    format!(
        r#":root {{
    --sidebar-width: {default}px;
    --sidebar-min-width: {min}px;
    --sidebar-max-width: {max}px;
}}"#,
        default = sidebar.default_width,
        min = sidebar.min_width,
        max = sidebar.max_width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_identity() {
        let config = SiteConfig::default();
        assert_eq!(config.site.title, "Nano Ink");
        assert_eq!(config.site.tagline, "Welcome to Learning Hub");
    }

    #[test]
    fn default_config_behavior_settings() {
        let config = SiteConfig::default();
        assert!(config.markdown.hard_breaks);
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.highlight.engine, HighlightEngine::Syntect);
        assert_eq!(config.sidebar.min_width, 180);
        assert_eq!(config.sidebar.max_width, 500);
        assert_eq!(config.quick_links.len(), 4);
        assert_eq!(config.quick_links[0].path, "DSA/README.md");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[search]
max_results = 5
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.search.max_results, 5);
        // Defaults preserved
        assert_eq!(config.site.title, "Nano Ink");
        assert_eq!(config.colors.dark.background, "#0a0a0a");
    }

    #[test]
    fn parse_highlight_engine() {
        let toml = r#"
[highlight]
engine = "basic"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.highlight.engine, HighlightEngine::Basic);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
    }

    #[test]
    fn unknown_highlight_engine_rejected() {
        let toml = r#"
[highlight]
engine = "prism"
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn sidebar_clamp() {
        let sidebar = SidebarConfig::default();
        assert_eq!(sidebar.clamp(50), 180);
        assert_eq!(sidebar.clamp(900), 500);
        assert_eq!(sidebar.clamp(300), 300);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Nano Ink");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r##"
[site]
title = "My Notes"

[colors.light]
accent = "#ff0000"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "My Notes");
        assert_eq!(config.colors.light.accent, "#ff0000");
        // Unspecified values stay default
        assert_eq!(config.site.tagline, "Welcome to Learning Hub");
        assert_eq!(config.colors.light.background, "#ffffff");
    }

    #[test]
    fn load_config_quick_links_replace_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[[quick_links]]
label = "Arrays"
path = "DSA/Arrays.md"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(
            config.quick_links,
            vec![QuickLink {
                label: "Arrays".to_string(),
                path: "DSA/Arrays.md".to_string(),
                emoji: String::new(),
            }]
        );
    }

    #[test]
    fn load_config_from_fixtures() {
        let tmp = crate::test_helpers::setup_fixtures();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Nano Ink");
        assert_eq!(config.search.max_results, 10);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // CSS generation tests
    // =========================================================================

    #[test]
    fn generate_color_css_uses_both_schemes() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("--color-bg: #1a1a1a"));
        assert!(css.contains(r#"[data-theme="light"]"#));
    }

    #[test]
    fn generate_color_css_includes_all_variables() {
        let css = generate_color_css(&ColorConfig::default());
        for var in [
            "--color-bg:",
            "--color-surface:",
            "--color-text:",
            "--color-text-muted:",
            "--color-border:",
            "--color-accent:",
            "--color-code-bg:",
        ] {
            assert!(css.contains(var), "missing {var}");
        }
    }

    #[test]
    fn dark_palette_is_root_default() {
        let css = generate_color_css(&ColorConfig::default());
        let light_at = css.find(r#"[data-theme="light"]"#).unwrap();
        let dark_bg_at = css.find("--color-bg: #0a0a0a").unwrap();
        assert!(css.starts_with(":root"));
        assert!(dark_bg_at < light_at);
    }

    #[test]
    fn generate_layout_css_uses_sidebar_bounds() {
        let css = generate_layout_css(&SidebarConfig::default());
        assert!(css.contains("--sidebar-width: 280px"));
        assert!(css.contains("--sidebar-min-width: 180px"));
        assert!(css.contains("--sidebar-max-width: 500px"));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // Merging over stock defaults
    // =========================================================================

    #[test]
    fn palette_override_keeps_other_colors() {
        let overrides: toml::Value = toml::from_str(
            r##"
[colors.dark]
accent = "#ff8800"
"##,
        )
        .unwrap();
        let merged = merge_toml(stock_defaults_value(), overrides);
        let dark = &merged["colors"]["dark"];
        assert_eq!(dark["accent"].as_str(), Some("#ff8800"));
        assert_eq!(dark["background"].as_str(), Some("#0a0a0a"));
        assert_eq!(merged["colors"]["light"]["accent"].as_str(), Some("#2563eb"));
    }

    #[test]
    fn scalar_override_replaces_value() {
        let overrides: toml::Value = toml::from_str("[sidebar]\ndefault_width = 320").unwrap();
        let config = apply_overrides(Some(overrides)).unwrap();
        assert_eq!(config.sidebar.default_width, 320);
        assert_eq!(config.sidebar.max_width, 500);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[search]
max_result = 5
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = r#"
[serach]
max_results = 5
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r##"
[colors.dark]
bg = "#000"
"##,
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_max_results() {
        let mut config = SiteConfig::default();
        config.search.max_results = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn validate_sidebar_bounds() {
        let mut config = SiteConfig::default();
        config.sidebar.min_width = 600;
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.sidebar.default_width = 100;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_width"));
    }

    #[test]
    fn validate_unknown_theme() {
        let mut config = SiteConfig::default();
        config.highlight.theme = "Nope".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("highlight.theme"));

        // The basic engine has no theme to check.
        config.highlight.engine = HighlightEngine::Basic;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_quick_link_must_be_note() {
        let mut config = SiteConfig::default();
        config.quick_links[0].path = "DSA/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[search]
max_results = 0
"#,
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Reading config.toml
    // =========================================================================

    #[test]
    fn no_config_file_means_no_overrides() {
        let tmp = TempDir::new().unwrap();
        assert!(read_overrides(tmp.path()).unwrap().is_none());
        assert_eq!(apply_overrides(None).unwrap().server.port, 3000);
    }

    #[test]
    fn config_directory_is_not_a_file() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(read_overrides(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn server_override_keeps_default_host() {
        let overrides: toml::Value = toml::from_str("[server]\nport = 8080").unwrap();
        let config = apply_overrides(Some(overrides)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.title, defaults.site.title);
        assert_eq!(config.site.description, defaults.site.description);
        assert_eq!(config.highlight.theme, defaults.highlight.theme);
        assert_eq!(config.search.max_results, defaults.search.max_results);
        assert_eq!(config.sidebar.default_width, defaults.sidebar.default_width);
        assert_eq!(config.colors.light.accent, defaults.colors.light.accent);
        assert_eq!(config.colors.dark.code_background, defaults.colors.dark.code_background);
        assert_eq!(config.quick_links, defaults.quick_links);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for section in [
            "site",
            "markdown",
            "highlight",
            "search",
            "sidebar",
            "colors",
            "server",
            "processing",
            "quick_links",
        ] {
            assert!(val.get(section).is_some(), "missing section {section}");
        }
    }
}
