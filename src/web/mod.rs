//! Web control plane.
//!
//! A small REST API to upload mapping sources, pick one and push its
//! rendering to the display, plus an embedded page that drives it.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/sources` - List stored sources and the current selection
//! - `POST /api/sources` - Upload a source (multipart field `file`)
//! - `POST /api/render` - Render a source and send it to the display
//! - `GET /api/sources/{filename}/preview` - Colour PNG preview of a source
//! - `GET /` - Embedded index page

pub mod static_files;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::display::{composite_png_bytes, sink_for, DisplaySink};
use crate::error::{QuadmapError, QuadmapResult};
use crate::pipeline::{RenderReport, Renderer};
use crate::render::splash::{access_lines, local_ip_address, render_splash};
use crate::source::{
    has_source_extension, validate_filename, CsvDirectory, DataSource, SourceEntry,
};

type SharedSink = Arc<Mutex<Box<dyn DisplaySink + Send>>>;
type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    config: Arc<Config>,
    /// Stored sources
    catalog: CsvDirectory,
    /// Renderer for the configured display (immutable after load)
    renderer: Arc<Renderer>,
    /// Display sink; holding the lock serialises renders
    sink: SharedSink,
    /// Last successfully rendered source
    selected: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: Config, sink: Box<dyn DisplaySink + Send>) -> anyhow::Result<Self> {
        let renderer = Renderer::from_config(&config)?;
        let catalog = CsvDirectory::new(config.paths.sources_dir.clone());
        Ok(Self {
            config: Arc::new(config),
            catalog,
            renderer: Arc::new(renderer),
            sink: Arc::new(Mutex::new(sink)),
            selected: Arc::new(RwLock::new(None)),
        })
    }

    /// Returns the source catalog.
    #[must_use]
    pub fn catalog(&self) -> &CsvDirectory {
        &self.catalog
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Draws the start-up screen on the display.
    pub async fn show_splash(&self, lines: Vec<String>) -> QuadmapResult<()> {
        let renderer = Arc::clone(&self.renderer);
        let mut sink = Arc::clone(&self.sink).lock_owned().await;

        run_blocking(move || {
            let (width, height) = renderer.size();
            let frame = render_splash(&lines, renderer.resources(), width, height);
            let (primary, accent) = frame.into_planes();
            sink.display(primary, accent)
        })
        .await
    }
}

async fn run_blocking<T, F>(task: F) -> QuadmapResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> QuadmapResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| QuadmapError::Sink(format!("render task failed: {e}")))?
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Source list response.
#[derive(Debug, Serialize)]
pub struct SourceListResponse {
    /// Stored sources, sorted by file name.
    pub sources: Vec<SourceEntry>,
    /// Source currently on the display, if any.
    pub selected: Option<String>,
}

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Name the source was stored under.
    pub filename: String,
}

/// Render request.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// File name of the source to render.
    pub selected_file: String,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

fn status_for(error: &QuadmapError) -> StatusCode {
    match error {
        QuadmapError::SourceData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        QuadmapError::Config(_) => StatusCode::BAD_REQUEST,
        QuadmapError::ResourceLoad { .. } | QuadmapError::Sink(_) | QuadmapError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(context: &str, error: &QuadmapError) -> (StatusCode, Json<ApiError>) {
    (
        status_for(error),
        Json(ApiError::with_details(context, error.to_string())),
    )
}

/// Validates a file name from a request and checks that the source exists.
fn existing_source(state: &AppState, filename: &str) -> ApiResult<String> {
    let filename = validate_filename(filename).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::with_details("Invalid filename", e.to_string())),
        )
    })?;

    if !state.catalog.contains(filename) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(format!("Source not found: {filename}"))),
        ));
    }

    Ok(filename.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/sources - List stored sources.
async fn list_sources(State(state): State<AppState>) -> ApiResult<Json<SourceListResponse>> {
    let sources = state
        .catalog
        .list()
        .map_err(|e| error_response("Failed to read sources directory", &e))?;
    let selected = state.selected.read().await.clone();

    Ok(Json(SourceListResponse { sources, selected }))
}

/// POST /api/sources - Store an uploaded source.
async fn upload_source(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::with_details("Invalid upload", e.body_text())),
        )
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err((StatusCode::BAD_REQUEST, Json(ApiError::new("No selected file"))));
        }
        if !has_source_extension(&filename) {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("Only .csv files are accepted")),
            ));
        }

        let contents = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError::with_details("Invalid upload", e.body_text())),
            )
        })?;

        let stored = state
            .catalog
            .save_upload(&filename, &contents)
            .map_err(|e| match e {
                QuadmapError::SourceData { .. } => (
                    StatusCode::BAD_REQUEST,
                    Json(ApiError::with_details("Invalid filename", e.to_string())),
                ),
                _ => error_response("Failed to store upload", &e),
            })?;

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse { filename: stored }),
        ));
    }

    Err((StatusCode::BAD_REQUEST, Json(ApiError::new("No file part"))))
}

/// POST /api/render - Render a source and send it to the display.
async fn render_source(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> ApiResult<Json<RenderReport>> {
    let filename = existing_source(&state, &request.selected_file)?;

    // One render at a time: the sink lock is held until the frame is delivered.
    let mut sink = Arc::clone(&state.sink).lock_owned().await;
    let catalog = state.catalog.clone();
    let renderer = Arc::clone(&state.renderer);
    let id = filename.clone();

    let report = run_blocking(move || {
        let table = catalog.load(&id)?;
        let (frame, report) = renderer.render_table(&table);
        let (primary, accent) = frame.into_planes();
        sink.display(primary, accent)?;
        Ok(report)
    })
    .await
    .map_err(|e| error_response("Failed to render source", &e))?;

    info!(
        "Rendered {} ({} rows) from {filename}",
        report.name, report.rows
    );
    *state.selected.write().await = Some(filename);

    Ok(Json(report))
}

/// GET /api/sources/{filename}/preview - Colour preview without touching the display.
async fn preview_source(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let filename = existing_source(&state, &filename)?;
    let catalog = state.catalog.clone();
    let renderer = Arc::clone(&state.renderer);

    let png = run_blocking(move || {
        let table = catalog.load(&filename)?;
        let (frame, _) = renderer.render_table(&table);
        composite_png_bytes(&frame.primary, &frame.accent)
    })
    .await
    .map_err(|e| error_response("Failed to render preview", &e))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

// ============================================================================
// Router
// ============================================================================

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    // The control plane is meant for a local network; any origin may call it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/sources", get(list_sources).post(upload_source))
        .route("/api/sources/{filename}/preview", get(preview_source))
        .route("/api/render", post(render_source))
        .fallback(static_files::serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the web server.
///
/// The configured display first shows where the server can be reached.
pub async fn run_server(config: Config, addr: SocketAddr) -> anyhow::Result<()> {
    let sink = sink_for(&config);
    info!("Display sink: {}", sink.name());
    let state = AppState::new(config, sink)?;

    let lines = access_lines(&local_ip_address(), addr.port());
    if let Err(e) = state.show_splash(lines).await {
        warn!("Could not show start-up screen: {e}");
    }

    let app = create_router(state);

    info!("Starting Quadmap web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
