// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP glue for the admission guard.
//!
//! The gate and the recovery boundary are exposed as axum middleware so the
//! embedding service can wrap any route behind them. Rejections are resolved
//! here, before the downstream handler runs; handler panics surface as a
//! generic 500 with no fault detail.

use crate::admission::{AdmissionGate, Decision};
use crate::config::Config;
use crate::guard::HandlerGuard;
use crate::identity;
use crate::metrics::Metrics;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Shared application state.
pub struct AppState {
    pub gate: AdmissionGate,
    pub guard: HandlerGuard,
    pub metrics: Metrics,
    pub config: Config,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub code: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "admission-guard",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics.render()
}

/// Stand-in upstream handler. Real deployments route to their own handlers
/// behind the middleware stack.
pub async fn upstream_placeholder() -> &'static str {
    "OK"
}

/// Resolve the client identity for a request.
fn request_identity(request: &Request, addr: Option<SocketAddr>) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok());
    let peer = addr
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    identity::resolve(forwarded, &peer)
}

/// Admission middleware: trusted bypass, blocklist, rate limit, suspicion
/// heuristic, in that order. Rejections never reach the inner service.
pub async fn admission(
    State(state): State<Arc<AppState>>,
    addr: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let identity = request_identity(&request, addr.map(|ConnectInfo(a)| a));
    let path = request.uri().path().to_string();

    let decision = state.gate.evaluate(&identity, &path).await;
    state
        .metrics
        .decisions
        .with_label_values(&[&decision.to_string()])
        .inc();

    match decision {
        Decision::Admit => next.run(request).await,
        Decision::RejectTooManyRequests => {
            info!(identity = %identity, path = %path, "request rejected: too many requests");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse {
                    error: "Too many requests. Try again later.",
                    code: "RATE_LIMITED",
                }),
            )
                .into_response()
        }
        Decision::RejectForbidden => {
            info!(identity = %identity, path = %path, "request rejected: suspicious activity");
            (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: "Suspicious activity detected",
                    code: "SUSPICIOUS_ACTIVITY",
                }),
            )
                .into_response()
        }
    }
}

/// Recovery middleware: runs the inner service behind the panic boundary
/// and maps a recovered fault to a bare 500.
pub async fn recover_faults(
    State(state): State<Arc<AppState>>,
    addr: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let identity = request_identity(&request, addr.map(|ConnectInfo(a)| a));

    match state
        .guard
        .run(&identity, "PANIC in request handler", next.run(request))
        .await
    {
        Ok(response) => response,
        Err(_fault) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Internal Server Error",
                code: "INTERNAL_ERROR",
            }),
        )
            .into_response(),
    }
}

/// Request accounting middleware: counts every request by method, path and
/// final status.
pub async fn track_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    state
        .metrics
        .http_requests
        .with_label_values(&[&method, &path, response.status().as_str()])
        .inc();
    response
}
