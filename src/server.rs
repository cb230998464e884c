//! HTTP entry point.
//!
//! Serves the same pages the static build writes, rendered per request from
//! one shared [`AppState`]. The manifest, configuration and renderer are
//! built once at startup and only read afterwards.
//!
//! | route                 | response                                     |
//! |-----------------------|----------------------------------------------|
//! | `GET /`               | home page                                    |
//! | `GET /docs/{*slug}`   | note page, or the 404 page with status 404   |
//! | `GET /api/pages`      | every note rendered, as JSON                 |
//! | `GET /api/search?q=`  | search hits, as JSON                         |
//! | `GET /search-index.json` | flat note list for the search modal       |
//! | `GET /assets/{file}`  | fingerprinted CSS/JS                         |
//! | `GET /images/*`       | files under `<docs>/images`                  |

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::{self, ConfigError, SiteConfig};
use crate::generate::{IMAGES_DIR, SiteAssets};
use crate::highlight::HighlightError;
use crate::manifest::ManifestRoot;
use crate::markdown::MarkdownRenderer;
use crate::page::{PageComposer, PageRecord};
use crate::prefs::UiPreferences;
use crate::scan::{self, ScanError};
use crate::search::{SearchHit, SearchIndex};
use crate::templates::{self, AssetLinks, SiteContext};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Highlighter error: {0}")]
    Highlight(#[from] HighlightError),
}

/// Read-only state shared by every request.
pub struct AppState {
    pub docs_root: PathBuf,
    pub manifest: ManifestRoot,
    pub config: SiteConfig,
    pub prefs: UiPreferences,
    pub renderer: MarkdownRenderer,
    pub assets: SiteAssets,
    links: AssetLinks,
    index: SearchIndex,
}

impl AppState {
    pub fn new(
        docs_root: &FsPath,
        manifest: ManifestRoot,
        config: SiteConfig,
        prefs: UiPreferences,
    ) -> Result<Self, ServeError> {
        let renderer = MarkdownRenderer::from_config(&config)?;
        let assets = SiteAssets::build(&config, renderer.highlighter());
        let links = assets.links();
        let index = SearchIndex::new(&manifest, config.search.max_results);
        Ok(Self {
            docs_root: docs_root.to_path_buf(),
            manifest,
            config,
            prefs,
            renderer,
            assets,
            links,
            index,
        })
    }

    /// Scan the docs root and load its configuration.
    pub fn load(docs_root: &FsPath, prefs: Option<UiPreferences>) -> Result<Self, ServeError> {
        let manifest = scan::scan(docs_root)?;
        let config = config::load_config(docs_root)?;
        let prefs = prefs.unwrap_or_else(|| UiPreferences::defaults(&config.sidebar));
        Self::new(docs_root, manifest, config, prefs)
    }

    fn composer(&self) -> PageComposer<'_> {
        PageComposer::new(&self.manifest, &self.renderer, &self.docs_root)
    }

    fn context(&self) -> SiteContext<'_> {
        SiteContext {
            config: &self.config,
            manifest: &self.manifest,
            prefs: &self.prefs,
            assets: &self.links,
        }
    }

    fn not_found(&self) -> Response {
        let page = templates::render_not_found(&self.context());
        (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let images = ServeDir::new(state.docs_root.join(IMAGES_DIR));
    Router::new()
        .route("/", get(home))
        .route("/docs/{*slug}", get(doc_page))
        .route("/api/pages", get(api_pages))
        .route("/api/search", get(api_search))
        .route("/search-index.json", get(search_index))
        .route("/assets/{file}", get(asset))
        .nest_service("/images", images)
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(state: Arc<AppState>) -> Result<(), ServeError> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

// ============================================================================
// Handlers
// ============================================================================

async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    let home = state.composer().home(&state.config);
    Html(templates::render_home(&state.context(), &home).into_string())
}

async fn doc_page(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    match state.composer().resolve_slug(&slug) {
        Ok(composed) => {
            Html(templates::render_doc_page(&state.context(), &composed).into_string()).into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "page not found");
            state.not_found()
        }
    }
}

#[derive(Serialize)]
struct PagesResponse {
    pages: Vec<PageRecord>,
}

/// Renders every note, so the work goes to the blocking pool.
async fn api_pages(State(state): State<Arc<AppState>>) -> Response {
    match tokio::task::spawn_blocking(move || state.composer().all_pages()).await {
        Ok(pages) => Json(PagesResponse { pages }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "page rendering task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    results: Vec<SearchHit>,
}

async fn api_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    Json(SearchResponse {
        results: state.index.hits(&params.q),
        query: params.q,
    })
}

async fn search_index(State(state): State<Arc<AppState>>) -> Response {
    match state.index.to_json() {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "could not serialize search index");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn asset(State(state): State<Arc<AppState>>, Path(file): Path<String>) -> Response {
    match state.assets.get(&file) {
        Some((body, mime)) => (
            [
                (header::CONTENT_TYPE, mime),
                (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
            ],
            body.to_string(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn fallback(State(state): State<Arc<AppState>>) -> Response {
    state.not_found()
}
