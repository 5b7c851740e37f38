use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use colored::*;
use portaudit_common::network::target::Target;
use portaudit_common::ports::PortSet;
use portaudit_core::{ScanOptions, ScanReport, Scanner};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::terminal::{colors, print};

#[derive(Clone)]
pub struct AppState {
    scanner: Scanner,
}

/// Body of `POST /scan`. Everything but `target` is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ScanRequest {
    pub target: Option<String>,
    pub scan_type: Option<String>,
    pub ports: Option<Vec<u16>>,
    pub timeout: Option<f64>,
}

pub async fn serve(bind: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding the API server to {bind}"))?;

    print::print_status(format!(
        "Listening on {}",
        format!("http://{bind}").color(colors::ACCENT)
    ));
    info!("API server listening on {bind}");

    axum::serve(listener, router(Scanner::new()))
        .await
        .context("API server stopped unexpectedly")
}

pub fn router(scanner: Scanner) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/scan", post(scan))
        .with_state(AppState { scanner })
        .layer(CorsLayer::permissive())
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "service": "portaudit",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

// Body rejections are answered in the same `{"error"}` shape as every other bad request.
async fn scan(
    State(state): State<AppState>,
    request: Result<Json<ScanRequest>, JsonRejection>,
) -> Response {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match run_scan(&state.scanner, request).await {
        Ok(report) => Json(report).into_response(),
        Err(message) => bad_request(message),
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

async fn run_scan(scanner: &Scanner, request: ScanRequest) -> Result<ScanReport, String> {
    let target = request
        .target
        .as_deref()
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .ok_or_else(|| String::from("Target is required"))?;

    let options = scan_options(&request)?;

    match request.scan_type.as_deref().unwrap_or("host") {
        "host" => {
            let target: Target = target.parse()?;
            if target.is_network() {
                return Err(format!(
                    "'{target}' is a network, use scan_type 'network' to scan it"
                ));
            }
            Ok(ScanReport::Host(
                scanner.scan_host(&target.to_string(), &options).await,
            ))
        }
        // CIDR parsing is left to the scanner so its error message is kept.
        "network" if !target.contains('/') => Err(format!(
            "'{target}' is not a network in CIDR notation"
        )),
        "network" => scanner
            .scan_network(target, &options)
            .await
            .map(ScanReport::Network)
            .map_err(|e| e.to_string()),
        other => Err(format!(
            "Invalid scan_type '{other}', expected 'host' or 'network'"
        )),
    }
}

fn scan_options(request: &ScanRequest) -> Result<ScanOptions, String> {
    let mut options = ScanOptions::default();

    if let Some(ports) = &request.ports {
        if ports.is_empty() {
            return Err(String::from("ports must not be empty"));
        }
        options.ports = PortSet::new(ports.iter().copied());
    }

    if let Some(secs) = request.timeout {
        if secs <= 0.0 {
            return Err(String::from("timeout must be greater than zero"));
        }
        options.timeout = Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())?;
    }

    Ok(options)
}
