//! HTTP surface for the import pipeline.
//!
//! `POST /api/contacts/import-group` runs one full import against the
//! configured sources and returns the report; `GET /api/health` is a liveness
//! check. Each import runs on the blocking pool with its own merge state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use justiguide_ingest::{import_group, ImportConfig, ImportReport, IngestError};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ImportConfig>,
    /// Relative source and output paths resolve against this.
    pub base_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(config: ImportConfig, base_dir: PathBuf) -> Self {
        Self {
            config: Arc::new(config),
            base_dir: Arc::new(base_dir),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Import(#[from] IngestError),

    #[error("import task failed: {0}")]
    Task(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "import failed");
        let body = json!({ "success": false, "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/contacts/import-group", post(import_group_handler))
        .route("/api/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn import_group_handler(
    State(state): State<AppState>,
) -> Result<Json<ImportReport>, ApiError> {
    info!(group = %state.config.group_name, "import requested");

    let (run, report) = tokio::task::spawn_blocking(move || {
        import_group(&state.config, &state.base_dir)
    })
    .await
    .map_err(|e| ApiError::Task(e.to_string()))??;

    info!(
        total = report.total_contacts,
        sources = run.sources.len(),
        saved = report.saved_to.is_some(),
        "import finished"
    );
    Ok(Json(report))
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_handler() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let address = listener.local_addr()?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
