//! Local preview server.
//!
//! Serves the built catalogue over HTTP so the site's client-side script
//! can be developed against live data. The catalogue is loaded once at
//! startup and shared read-only across handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/api/stats` | [`CatalogStats`](crate::catalog::CatalogStats) |
//! | `GET`  | `/api/programs` | Programme index |
//! | `GET`  | `/api/projects?<state>` | One [`ProjectPage`] of filtered projects |
//! | `GET`  | `/programs/{slug}?<state>` | HTML cards for one programme |
//! | `GET`  | `/focus/{ai\|wearables}?<state>` | HTML focus cards |
//!
//! `<state>` is the query string understood by
//! [`read_url_state`](crate::url_state::read_url_state).
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "programme not found: spp-9" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a dev server on
//! another port can call the API.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::catalog::{Catalog, CatalogStats};
use crate::config::Config;
use crate::get::{program_listings, ProgramListing};
use crate::models::ProjectView;
use crate::render::{render_listing, CardLayout, Focus};
use crate::search::{project_views, search_page, ProjectPage};
use crate::url_state::read_url_state;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
    base_url: Arc<str>,
}

/// Starts the preview server.
///
/// Loads the catalogue from `[data]`, binds to `[server].bind` and runs until
/// the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let catalog = Catalog::from_config(config)?;
    run_server_with_catalog(config, Arc::new(catalog)).await
}

/// Starts the preview server over an already-built catalogue.
///
/// Useful for tests and for binaries that build the catalogue from a custom
/// [`DataSource`](crate::traits::DataSource).
pub async fn run_server_with_catalog(config: &Config, catalog: Arc<Catalog>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(catalog, &config.site.base_url);

    info!(bind = %bind_addr, "preview server listening");
    println!("Preview server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The application router, without a listener.
pub fn router(catalog: Arc<Catalog>, base_url: &str) -> Router {
    let state = AppState {
        catalog,
        base_url: Arc::from(base_url),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/stats", get(handle_stats))
        .route("/api/programs", get(handle_programs))
        .route("/api/projects", get(handle_projects))
        .route("/programs/{slug}", get(handle_program_page))
        .route("/focus/{kind}", get(handle_focus_page))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (`"bad_request"`, `"not_found"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/* ============

async fn handle_stats(State(state): State<AppState>) -> Json<CatalogStats> {
    Json(state.catalog.stats())
}

#[derive(Serialize)]
struct ProgramsResponse {
    programs: Vec<ProgramListing>,
}

async fn handle_programs(State(state): State<AppState>) -> Json<ProgramsResponse> {
    Json(ProgramsResponse {
        programs: program_listings(&state.catalog),
    })
}

/// Handler for `GET /api/projects`.
///
/// The `tab` parameter selects a focus subset (`ai` or `wearables`) when
/// present; an unknown tab is a 400.
async fn handle_projects(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<ProjectPage>, AppError> {
    let filter = read_url_state(query.as_deref().unwrap_or_default());
    let focus = if filter.tab.is_empty() {
        None
    } else {
        Some(
            Focus::parse(&filter.tab)
                .ok_or_else(|| bad_request(format!("unknown tab: {}", filter.tab)))?,
        )
    };

    let views = project_views(&state.catalog, focus);
    Ok(Json(search_page(&views, &filter)))
}

// ============ HTML fragments ============

async fn handle_program_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, AppError> {
    let program = state
        .catalog
        .program_by_slug(&slug)
        .ok_or_else(|| not_found(format!("programme not found: {}", slug)))?;

    let filter = read_url_state(query.as_deref().unwrap_or_default());
    let views: Vec<ProjectView> = program.projects.iter().map(ProjectView::from).collect();
    let result = search_page(&views, &filter);

    Ok(Html(render_listing(
        &result.projects,
        result.total,
        result.page,
        CardLayout::List { show_spp: false },
        &state.base_url,
    )))
}

async fn handle_focus_page(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, AppError> {
    let focus =
        Focus::parse(&kind).ok_or_else(|| not_found(format!("no focus list named: {}", kind)))?;

    let filter = read_url_state(query.as_deref().unwrap_or_default());
    let views = project_views(&state.catalog, Some(focus));
    let result = search_page(&views, &filter);

    Ok(Html(render_listing(
        &result.projects,
        result.total,
        result.page,
        CardLayout::Focus(focus),
        &state.base_url,
    )))
}
