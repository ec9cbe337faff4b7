//! Development HTTP server.
//!
//! Serves the static directory under the assets path, falls back to the HTML
//! template for history-style routes, and exposes the bootstrapped pipeline
//! plus an error-report endpoint the bundler watcher posts compile failures
//! to.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use kiln_pipeline::{CompileError, ErrorNotifier, PipelineDescription, Severity};
use serde::Deserialize;
use tokio::net::{TcpListener, lookup_host};
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{debug, info};

use crate::error::{CliError, Result};

pub const PIPELINE_ROUTE: &str = "/__kiln/pipeline";
pub const ERRORS_ROUTE: &str = "/__kiln/errors";

/// What the server needs to know about the project on disk.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// URL prefix the static directory is mounted at, e.g. `/static`
    pub static_mount: String,
    pub static_dir: PathBuf,
    pub template: PathBuf,
}

#[derive(Clone)]
struct ServerState {
    pipeline: Arc<PipelineDescription>,
    notifier: Option<ErrorNotifier>,
}

/// Body of an error report.
#[derive(Debug, Deserialize)]
struct ErrorReport {
    severity: Severity,
    #[serde(default)]
    errors: Vec<CompileError>,
}

/// Build the dev server router.
pub fn router(
    pipeline: PipelineDescription,
    notifier: Option<ErrorNotifier>,
    options: &ServeOptions,
) -> Router {
    let compress = pipeline
        .dev_server
        .as_ref()
        .is_some_and(|server| server.compress);

    let state = ServerState {
        pipeline: Arc::new(pipeline),
        notifier,
    };

    let app = Router::new()
        .route(PIPELINE_ROUTE, get(pipeline_handler))
        .route(ERRORS_ROUTE, post(errors_handler))
        .with_state(state);

    let template = ServeFile::new(&options.template);
    let app = if options.static_mount == "/" {
        app.fallback_service(ServeDir::new(&options.static_dir).fallback(template))
    } else {
        app.nest_service(&options.static_mount, ServeDir::new(&options.static_dir))
            .fallback_service(template)
    };

    if compress {
        app.layer(CompressionLayer::new())
    } else {
        app
    }
}

/// Resolve `host:port` to the address the port probe checked: IPv4 when the
/// host has one, otherwise the first address.
pub async fn listen_addr(host: &str, port: u16) -> Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = lookup_host((host, port))
        .await
        .map_err(|e| CliError::Server(format!("cannot resolve {host}: {e}")))?
        .collect();

    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| CliError::Server(format!("{host} resolved to no addresses")))
}

/// Bind `host:port` and serve until `shutdown` resolves.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listen_addr(host, port).await?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| CliError::Server(format!("cannot bind {host}:{port}: {e}")))?;
    info!(addr = %listener.local_addr()?, "dev server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| CliError::Server(e.to_string()))
}

async fn pipeline_handler(State(state): State<ServerState>) -> impl IntoResponse {
    Json(state.pipeline.as_ref().clone())
}

async fn errors_handler(
    State(state): State<ServerState>,
    Json(report): Json<ErrorReport>,
) -> StatusCode {
    debug!(severity = %report.severity, count = report.errors.len(), "compile report");
    if let Some(notifier) = &state.notifier {
        notifier.on_errors(report.severity, &report.errors);
    }
    StatusCode::NO_CONTENT
}
