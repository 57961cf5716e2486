// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for the admission path.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Metrics registry for the service.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    /// Requests by method, path and response status
    pub http_requests: IntCounterVec,
    /// Admission decisions by outcome
    pub decisions: IntCounterVec,
    /// Outbound alerts dispatched
    pub alerts_sent: IntCounter,
}

impl Metrics {
    /// Create and register all collectors.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )?;
        let decisions = IntCounterVec::new(
            Opts::new("admission_decisions_total", "Admission decisions by outcome"),
            &["outcome"],
        )?;
        let alerts_sent = IntCounter::new("alerts_sent_total", "Outbound alerts dispatched")?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(decisions.clone()))?;
        registry.register(Box::new(alerts_sent.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            decisions,
            alerts_sent,
        })
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if encoder
            .encode(&self.registry.gather(), &mut buf)
            .is_err()
        {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
