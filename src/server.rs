//! Local preview server.
//!
//! Every request reloads the article store, the way each page of the site
//! fetches the index on load. Listing state, the article id and the landing
//! page state travel in the query string, so any view can be bookmarked.
//! Paths matching no route are looked up in `assets_dir` when one is set.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use crate::config::{SiteConfig, BUILTIN_COVER};
use crate::error::{FolioError, Result};
use crate::html::{
    render_article, render_landing, render_listing, render_status, Chrome, Templates,
    DEFAULT_COVER_SVG, STYLESHEET,
};
use crate::landing::{landing_transition, LandingView};
use crate::listing::{ListingState, ListingView};
use crate::markup::Markup;
use crate::notice::Notice;
use crate::query::{article_id, Links};
use crate::reader::{resolve, ReaderView, StatusPanel};
use crate::store::{StoreLoader, StoreSource};
use crate::theme::FileThemeStore;

/// Immutable state shared by all handlers.
#[derive(Debug)]
pub struct AppState {
    pub config: SiteConfig,
    pub loader: StoreLoader,
    pub templates: Templates,
    pub markup: Markup,
    pub theme_store: FileThemeStore,
}

impl AppState {
    pub fn new(config: SiteConfig) -> Result<Self> {
        Ok(Self {
            loader: StoreLoader::new(StoreSource::parse(&config.store.source)),
            templates: Templates::load(config.templates_dir.as_deref())?,
            markup: Markup::new()?,
            theme_store: FileThemeStore::new(config.theme.prefs_file.clone()),
            config,
        })
    }

    async fn chrome(&self) -> Chrome {
        Chrome::new(
            &self.config,
            Links::Server,
            self.theme_store.load_async().await,
        )
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let assets = state.config.assets_dir.clone();
    let router = Router::new()
        .route("/", get(handle_listing))
        .route("/articles.html", get(handle_listing))
        .route("/article.html", get(handle_article))
        .route("/home.html", get(handle_landing))
        .route("/articles.json", get(handle_store))
        .route("/style.css", get(handle_stylesheet))
        .route(&format!("/{BUILTIN_COVER}"), get(handle_default_cover))
        .with_state(state);
    match assets {
        Some(dir) => {
            debug!(dir = %dir.display(), "serving assets");
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    }
}

/// Binds and serves until the process is stopped.
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|e| FolioError::Server(format!("cannot bind {bind}: {e}")))?;
    let bound_addr: SocketAddr = listener
        .local_addr()
        .map_err(|e| FolioError::Server(e.to_string()))?;
    info!(%bound_addr, source = %state.loader.source(), "HTTP server listening");

    axum::serve(listener, build_router(Arc::new(state)))
        .await
        .map_err(|e| FolioError::Server(e.to_string()))
}

async fn handle_listing(State(app): State<Arc<AppState>>, RawQuery(query): RawQuery) -> Response {
    let state = ListingState::from_query(query.as_deref().unwrap_or_default());
    debug!(?state, "listing request");
    let view = match app.loader.load().await {
        Ok(store) => ListingView::build(store.records(), &state, &app.config.display),
        Err(e) => {
            warn!(error = %e, "article store unavailable for listing");
            ListingView::unavailable(
                &state,
                Notice::error("Articles data not found. Check the store path or URL."),
            )
        }
    };
    Html(render_listing(&view, &app.chrome().await, &app.templates)).into_response()
}

async fn handle_landing(State(app): State<Arc<AppState>>, RawQuery(query): RawQuery) -> Response {
    let transition = landing_transition(query.as_deref().unwrap_or_default());
    if let Some(notice) = &transition.notice {
        debug!(%notice, "landing request raised a notice");
    }
    let view = LandingView::build(&app.config.portfolio, transition);
    Html(render_landing(&view, &app.chrome().await, &app.templates)).into_response()
}

async fn handle_article(State(app): State<Arc<AppState>>, RawQuery(query): RawQuery) -> Response {
    let chrome = app.chrome().await;
    let Some(id) = article_id(query.as_deref().unwrap_or_default()) else {
        return status_response(StatusPanel::MissingId, None, &chrome, &app.templates);
    };

    let store = app.loader.load().await;
    if let Err(e) = &store {
        warn!(error = %e, %id, "article store unavailable for reader");
    }
    match resolve(
        Some(id.as_str()),
        store.as_ref(),
        &app.markup,
        &app.config.display,
        &app.config.site.title,
    ) {
        ReaderView::Article(page) => {
            Html(render_article(&page, &chrome, &app.templates)).into_response()
        }
        ReaderView::Status(StatusPanel::LoadFailed) => status_response(
            StatusPanel::LoadFailed,
            Some(&Notice::error("Could not fetch the article index.")),
            &chrome,
            &app.templates,
        ),
        ReaderView::Status(panel) => status_response(panel, None, &chrome, &app.templates),
    }
}

fn status_response(
    panel: StatusPanel,
    notice: Option<&Notice>,
    chrome: &Chrome,
    templates: &Templates,
) -> Response {
    let code = match panel {
        StatusPanel::MissingId | StatusPanel::NotFound => StatusCode::NOT_FOUND,
        StatusPanel::LoadFailed => StatusCode::BAD_GATEWAY,
    };
    (code, Html(render_status(panel, notice, chrome, templates))).into_response()
}

async fn handle_store(State(app): State<Arc<AppState>>) -> Response {
    match app.loader.fetch_bytes().await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => {
            warn!(error = %e, "article store unavailable");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

async fn handle_stylesheet() -> Response {
    ([(header::CONTENT_TYPE, "text/css")], STYLESHEET).into_response()
}

/// The configured assets dir may ship its own cover under the same name.
async fn handle_default_cover(State(app): State<Arc<AppState>>) -> Response {
    if let Some(dir) = &app.config.assets_dir {
        let path = dir.join(BUILTIN_COVER);
        if let Ok(bytes) = tokio::fs::read(&path).await {
            return ([(header::CONTENT_TYPE, "image/svg+xml")], bytes).into_response();
        }
    }
    ([(header::CONTENT_TYPE, "image/svg+xml")], DEFAULT_COVER_SVG).into_response()
}
