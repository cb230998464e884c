//! HTML templates.
//!
//! Every page shares one shell: a fixed header (brand, search button, theme
//! toggle), the sidebar tree and a main column. The shell starts in the
//! reader's stored theme, sidebar width and collapse state; a small inline
//! script re-applies `localStorage` values before first paint so static pages
//! agree with what the reader chose last time.
//!
//! Uses [maud](https://maud.lambda.xyz/); all interpolation is escaped except
//! rendered note HTML and the fixed SVG icons.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::config::{SidebarConfig, SiteConfig};
use crate::manifest::ManifestRoot;
use crate::nav::render_tree;
use crate::page::{Breadcrumb, CategoryCard, ComposedPage, HomePage};
use crate::prefs::UiPreferences;
use crate::types::Heading;

const LOGO_ICON: &str = r#"<svg class="brand-icon" viewBox="0 0 24 24" fill="none"><path d="M13 2L3 14h9l-1 8 10-12h-9l1-8z" fill="currentColor"/></svg>"#;
const SEARCH_ICON: &str = r#"<svg class="icon" fill="none" stroke="currentColor" viewBox="0 0 24 24"><circle cx="11" cy="11" r="8"/><path d="m21 21-4.35-4.35"/></svg>"#;
const SUN_ICON: &str = r#"<svg class="icon theme-icon-sun" fill="none" stroke="currentColor" stroke-width="2" viewBox="0 0 24 24"><circle cx="12" cy="12" r="4"/><path d="M12 2v2m0 16v2M4.93 4.93l1.41 1.41m11.32 11.32l1.41 1.41M2 12h2m16 0h2M6.34 17.66l-1.41 1.41M19.07 4.93l-1.41 1.41"/></svg>"#;
const MOON_ICON: &str = r#"<svg class="icon theme-icon-moon" fill="currentColor" viewBox="0 0 24 24"><path d="M21 12.79A9 9 0 1 1 11.21 3 7 7 0 0 0 21 12.79z"/></svg>"#;
const ARROW_ICON: &str = r#"<svg class="card-arrow" fill="none" stroke="currentColor" viewBox="0 0 24 24"><polyline points="9 18 15 12 9 6"/></svg>"#;
const FOLDER_ICON: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5"><path d="M22 19a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h5l2 3h9a2 2 0 0 1 2 2z"/></svg>"#;

/// Card icons for well-known category folders.
const CATEGORY_ICONS: &[(&str, &str)] = &[
    (
        "DSA",
        r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5"><path d="M12 2L2 7l10 5 10-5-10-5z"/><path d="M2 17l10 5 10-5"/><path d="M2 12l10 5 10-5"/></svg>"#,
    ),
    (
        "Database",
        r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5"><ellipse cx="12" cy="5" rx="9" ry="3"/><path d="M21 12c0 1.66-4 3-9 3s-9-1.34-9-3"/><path d="M3 5v14c0 1.66 4 3 9 3s9-1.34 9-3V5"/></svg>"#,
    ),
    (
        "ComputerNetworks",
        r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5"><rect x="2" y="3" width="20" height="14" rx="2"/><line x1="8" y1="21" x2="16" y2="21"/><line x1="12" y1="17" x2="12" y2="21"/></svg>"#,
    ),
    (
        "Linux",
        r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5"><path d="M4 17l6-6-6-6"/><path d="M12 19h8"/></svg>"#,
    ),
    (
        "WebDev",
        r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5"><polyline points="16 18 22 12 16 6"/><polyline points="8 6 2 12 8 18"/></svg>"#,
    ),
];

/// URLs of the fingerprinted stylesheet and script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLinks {
    pub style: String,
    pub script: String,
}

/// Everything the shell needs besides the page body.
pub struct SiteContext<'a> {
    pub config: &'a SiteConfig,
    pub manifest: &'a ManifestRoot,
    pub prefs: &'a UiPreferences,
    pub assets: &'a AssetLinks,
}

// ============================================================================
// Pages
// ============================================================================

pub fn render_doc_page(ctx: &SiteContext, composed: &ComposedPage) -> Markup {
    let page = &composed.page;
    let content = html! {
        div.doc-layout {
            div.doc-body.page-enter {
                (render_breadcrumb(&composed.breadcrumb))
                article.prose id="article" data-path=(composed.file_path) {
                    (PreEscaped(&page.content))
                }
            }
            (render_toc(&page.headings))
        }
    };
    let title = format!("{} | {}", page.title, ctx.config.site.title);
    base_document(ctx, &title, Some(&composed.file_path), content)
}

pub fn render_home(ctx: &SiteContext, home: &HomePage) -> Markup {
    let site = &ctx.config.site;
    let content = html! {
        div.home {
            section.hero {
                h1 { (site.tagline) }
                p.hero-description { (site.description) }
            }
            @if !home.categories.is_empty() {
                section.home-section {
                    h2.section-label { "Browse Topics" }
                    div.category-grid {
                        @for card in &home.categories {
                            (category_card(card))
                        }
                    }
                }
            }
            @if !home.quick_links.is_empty() {
                section.home-section {
                    h2.section-label { "Quick Start" }
                    div.quick-links {
                        @for link in &home.quick_links {
                            a.quick-link href=(link.href) {
                                @if !link.emoji.is_empty() {
                                    span.quick-link-emoji { (link.emoji) }
                                }
                                span { (link.label) }
                            }
                        }
                    }
                }
            }
        }
    };
    base_document(ctx, &site.title, None, content)
}

pub fn render_not_found(ctx: &SiteContext) -> Markup {
    let content = html! {
        div.not-found {
            h1.not-found-code { "404" }
            h2 { "Page Not Found" }
            p { "The page you're looking for doesn't exist or has been moved." }
            a.button-primary href="/" { "Go to Home" }
        }
    };
    let title = format!("Page Not Found | {}", ctx.config.site.title);
    base_document(ctx, &title, None, content)
}

// ============================================================================
// Components
// ============================================================================

fn base_document(ctx: &SiteContext, title: &str, active_path: Option<&str>, content: Markup) -> Markup {
    let prefs = ctx.prefs;
    html! {
        (DOCTYPE)
        html lang="en" data-theme=(prefs.theme.as_str()) style=(format!("--sidebar-width: {}px", prefs.sidebar_width)) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                meta name="description" content=(ctx.config.site.description);
                script { (PreEscaped(restore_prefs_script(&ctx.config.sidebar))) }
                link rel="stylesheet" href=(ctx.assets.style);
            }
            body {
                (site_header(ctx))
                div.layout {
                    (sidebar(ctx, active_path))
                    main.main-content id="main" {
                        (content)
                    }
                }
                (search_modal())
                script src=(ctx.assets.script) defer {}
            }
        }
    }
}

/// Re-applies the stored theme and sidebar width before first paint.
fn restore_prefs_script(sidebar: &SidebarConfig) -> String {
    format!(
        "(function(){{try{{var d=document.documentElement;\
var t=localStorage.getItem('theme');if(t==='dark'||t==='light')d.dataset.theme=t;\
var w=parseInt(localStorage.getItem('sidebarWidth'),10);\
if(w>0)d.style.setProperty('--sidebar-width',Math.min({max},Math.max({min},w))+'px');\
}}catch(e){{}}}})();",
        min = sidebar.min_width,
        max = sidebar.max_width,
    )
}

fn site_header(ctx: &SiteContext) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" {
                (PreEscaped(LOGO_ICON))
                span.brand-title { (ctx.config.site.title) }
            }
            div.header-actions {
                button.search-button id="search-open" type="button" title="Search (Ctrl+K)" {
                    (PreEscaped(SEARCH_ICON))
                    span.search-button-label { "Search..." }
                    kbd { "⌘K" }
                }
                button.icon-button id="theme-toggle" type="button" aria-label="Toggle theme" {
                    (PreEscaped(SUN_ICON))
                    (PreEscaped(MOON_ICON))
                }
                button.icon-button id="menu-toggle" type="button" aria-label="Toggle menu" {
                    span.menu-line {}
                    span.menu-line {}
                    span.menu-line {}
                }
            }
        }
    }
}

fn sidebar(ctx: &SiteContext, active_path: Option<&str>) -> Markup {
    let mut state = ctx.prefs.nav_state(ctx.manifest);
    if let Some(path) = active_path {
        state.expand_to_path(ctx.manifest, path);
    }
    html! {
        aside.sidebar id="sidebar" {
            div.sidebar-filter {
                input id="nav-filter" type="search" placeholder="Filter notes..." aria-label="Filter notes";
            }
            nav.sidebar-tree aria-label="Notes" {
                (render_tree(ctx.manifest, &state.view(), active_path))
            }
            div.sidebar-resize id="sidebar-resize" role="separator" aria-orientation="vertical" {}
        }
    }
}

pub fn render_breadcrumb(breadcrumb: &Breadcrumb) -> Markup {
    html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            @for crumb in &breadcrumb.ancestors {
                a.crumb href=(crumb.href) { (crumb.label) }
                span.crumb-sep { "/" }
            }
            span.crumb-current aria-current="page" { (breadcrumb.current) }
        }
    }
}

/// Table of contents, indented by heading level.
pub fn render_toc(headings: &[Heading]) -> Markup {
    html! {
        aside.toc id="toc" {
            h3.toc-title { "Contents" }
            @if headings.is_empty() {
                p.toc-empty { "No headings found" }
            } @else {
                nav.toc-list {
                    @for heading in headings {
                        a.toc-link.toc-strong[heading.level == 1]
                            href={ "#" (heading.id) }
                            title=(heading.text)
                            style=(format!("padding-left: {}px", (heading.level.saturating_sub(1)) as u32 * 8)) {
                            (heading.text)
                        }
                    }
                }
            }
        }
    }
}

fn category_card(card: &CategoryCard) -> Markup {
    let icon = CATEGORY_ICONS
        .iter()
        .find(|(name, _)| *name == card.name)
        .map(|(_, svg)| *svg)
        .unwrap_or(FOLDER_ICON);
    html! {
        a.category-card href=(card.href) {
            div.category-icon { (PreEscaped(icon)) }
            div.category-text {
                h3 { (card.label) }
                span.category-count { (card.count_label()) }
            }
            (PreEscaped(ARROW_ICON))
        }
    }
}

fn search_modal() -> Markup {
    html! {
        div.search-modal id="search-modal" hidden {
            div.search-backdrop data-close {}
            div.search-dialog role="dialog" aria-modal="true" aria-label="Search" {
                div.search-input-row {
                    (PreEscaped(SEARCH_ICON))
                    input id="search-input" type="text" placeholder="Search documentation..." autocomplete="off" spellcheck="false";
                    kbd { "ESC" }
                }
                div.search-results id="search-results" {
                    p.search-empty { "Type to search..." }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
