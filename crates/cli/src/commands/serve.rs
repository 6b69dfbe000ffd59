use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use jobspot_core::SiteConfig;
use jobspot_generator::{CacheStatus, PageCache, RenderedPage, Route};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const X_CACHE: &str = "x-cache";

#[derive(Clone)]
struct AppState {
    cache: PageCache,
}

/// Serve the site until the process is stopped.
///
/// Pages render on first request and are regenerated in the background
/// once their window has passed.
pub async fn run(site: SiteConfig, port: Option<u16>, fixture: Option<PathBuf>) -> Result<()> {
    let store = super::open_store(&site, fixture.as_deref())?;
    let port = port.unwrap_or(site.port);
    tracing::info!(site = %site.site_name, base_url = %site.base_url, "starting server");

    let app = router(PageCache::new(store, Arc::new(site)));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to port {}", port))?;
    tracing::info!("listening on http://localhost:{}", port);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

pub fn router(cache: PageCache) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/jobs/{id}", get(job_handler))
        .route("/articles", get(articles_handler))
        .route("/articles/{slug}", get(article_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { cache })
}

async fn home_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    serve_route(&state, Route::Home, &headers).await
}

async fn job_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    serve_route(&state, Route::Job(id), &headers).await
}

async fn articles_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    serve_route(&state, Route::Articles, &headers).await
}

async fn article_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    serve_route(&state, Route::Article(slug), &headers).await
}

async fn sitemap_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    serve_route(&state, Route::Sitemap, &headers).await
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn serve_route(state: &AppState, route: Route, request_headers: &HeaderMap) -> Response {
    let window = route.revalidate();
    let (page, status) = state.cache.serve(route).await;
    respond(&page, status, window.as_secs(), request_headers)
}

fn respond(
    page: &RenderedPage,
    status: CacheStatus,
    max_age: u64,
    request_headers: &HeaderMap,
) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(page.content_type));
    headers.insert(X_CACHE, HeaderValue::from_static(status.as_str()));

    if page.is_not_found() {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        return (StatusCode::NOT_FOUND, headers, page.body.clone()).into_response();
    }

    let cache_control = format!(
        "public, s-maxage={}, stale-while-revalidate={}",
        max_age, max_age
    );
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    if let Ok(value) = HeaderValue::from_str(&page.etag) {
        headers.insert(header::ETAG, value);
    }

    if etag_matches(request_headers, &page.etag) {
        headers.remove(header::CONTENT_TYPE);
        return (StatusCode::NOT_MODIFIED, headers).into_response();
    }

    (StatusCode::OK, headers, page.body.clone()).into_response()
}

/// Whether `If-None-Match` names the current representation
fn etag_matches(request_headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = request_headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    value.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate == etag || candidate.strip_prefix("W/") == Some(etag)
    })
}
