// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Admission Guard Service
//!
//! Wires the admission gate, panic boundary and escalation pipeline into an
//! axum server. Every route runs behind the full middleware stack; the
//! downstream handler here is a stand-in for the embedding application's
//! own handlers.
//!
//! ## Configuration
//!
//! Environment variables, all optional:
//!
//! - `BIND_ADDR`: server bind address (default: 0.0.0.0:8080)
//! - `REQUEST_LIMIT`: max requests per identity per window (default: 100)
//! - `BLOCK_DURATION_SECS`: block window in seconds (default: 3600)
//! - `IDLE_EVICT_SECS`: counter idle eviction in seconds (default: 600)
//! - `ERROR_THRESHOLD`: faults before escalation (default: 5)
//! - `TRUSTED_IPS`: comma-separated identities exempt from limits
//! - `SUSPICIOUS_PATHS`: comma-separated path substrings
//! - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`: alert credentials; dispatch
//!   is disabled when either is missing

use axum::{middleware, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use admission_guard::{
    config::{AdmissionConfig, AlertConfig, Config},
    handlers::{self, AppState},
    metrics::Metrics,
    AdmissionGate, Blocklist, EscalationPipeline, HandlerGuard, Reaper, RequestCounters,
    SecurityLog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        request_limit = config.admission.request_limit,
        block_secs = config.admission.block_secs,
        error_threshold = config.alerts.error_threshold,
        alerting = config.alerts.dispatch_configured(),
        "Starting admission guard"
    );

    // Shared stores and pipeline
    let counters = Arc::new(RequestCounters::new());
    let blocklist = Arc::new(Blocklist::new(config.admission.block_duration()));
    let security_log = SecurityLog::default();
    let metrics = Metrics::new()?;

    let escalation = Arc::new(
        EscalationPipeline::new(
            config.alerts.clone(),
            blocklist.clone(),
            security_log.clone(),
        )
        .with_alert_counter(metrics.alerts_sent.clone()),
    );

    let gate = AdmissionGate::new(
        &config.admission,
        counters.clone(),
        blocklist.clone(),
        security_log,
    );
    let guard = HandlerGuard::new(escalation.clone());

    let state = Arc::new(AppState {
        gate,
        guard,
        metrics,
        config: config.clone(),
    });

    // Background sweeps
    let _reaper = Reaper::spawn(
        counters,
        blocklist,
        escalation,
        &config.admission,
        &config.alerts,
    );

    // Guarded routes: accounting -> admission -> panic boundary -> handler.
    // Health and metrics stay outside the gate.
    let guarded = Router::new()
        .route("/", get(handlers::upstream_placeholder))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    handlers::track_requests,
                ))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    handlers::admission,
                ))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    handlers::recover_faults,
                )),
        );

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .merge(guarded)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
    })
    .await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let defaults = AdmissionConfig::default();
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        admission: AdmissionConfig {
            request_limit: env_parsed("REQUEST_LIMIT").unwrap_or(defaults.request_limit),
            block_secs: env_parsed("BLOCK_DURATION_SECS").unwrap_or(defaults.block_secs),
            idle_evict_secs: env_parsed("IDLE_EVICT_SECS").unwrap_or(defaults.idle_evict_secs),
            trusted: env_list("TRUSTED_IPS").unwrap_or(defaults.trusted),
            suspicious_paths: env_list("SUSPICIOUS_PATHS").unwrap_or(defaults.suspicious_paths),
            ..Default::default()
        },
        alerts: AlertConfig {
            bot_token: std::env::var("TELEGRAM_BOT_TOKEN").ok().filter(|v| !v.is_empty()),
            chat_id: std::env::var("TELEGRAM_CHAT_ID").ok().filter(|v| !v.is_empty()),
            error_threshold: env_parsed("ERROR_THRESHOLD")
                .unwrap_or_else(|| AlertConfig::default().error_threshold),
            ..Default::default()
        },
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_list(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
