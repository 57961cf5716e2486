// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The admission gate.
//!
//! Evaluates every inbound request against the trust list, the blocklist,
//! the request counters and the suspicion heuristic, in that order, and
//! returns a single admit/reject decision. Rejecting paths also block the
//! identity and append a security event.

use crate::blocklist::Blocklist;
use crate::config::AdmissionConfig;
use crate::counter::RequestCounters;
use crate::events::{SecurityEventKind, SecurityLog};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Invoke the downstream handler
    Admit,
    /// Identity is rate limited or blocked (HTTP 429)
    RejectTooManyRequests,
    /// Suspicious activity detected (HTTP 403)
    RejectForbidden,
}

impl Decision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admit)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admit => write!(f, "admit"),
            Self::RejectTooManyRequests => write!(f, "too_many_requests"),
            Self::RejectForbidden => write!(f, "forbidden"),
        }
    }
}

/// Per-request admission control.
pub struct AdmissionGate {
    trusted: HashSet<String>,
    suspicious_paths: Vec<String>,
    request_limit: u32,
    counters: Arc<RequestCounters>,
    blocklist: Arc<Blocklist>,
    security_log: SecurityLog,
}

impl AdmissionGate {
    /// Create a gate over the given shared stores.
    pub fn new(
        config: &AdmissionConfig,
        counters: Arc<RequestCounters>,
        blocklist: Arc<Blocklist>,
        security_log: SecurityLog,
    ) -> Self {
        Self {
            trusted: config.trusted.iter().cloned().collect(),
            suspicious_paths: config.suspicious_paths.clone(),
            request_limit: config.request_limit,
            counters,
            blocklist,
            security_log,
        }
    }

    /// Decide whether a request from `identity` for `path` may proceed.
    pub async fn evaluate(&self, identity: &str, path: &str) -> Decision {
        // Step 1: trusted identities bypass everything
        if self.is_trusted(identity) {
            return Decision::Admit;
        }

        // Step 2: active block
        if self.blocklist.is_blocked(identity).await {
            self.security_log
                .emit(SecurityEventKind::BlockedAccess, identity, path);
            return Decision::RejectTooManyRequests;
        }

        // Step 3: count the request and enforce the limit
        let count = self.counters.record(identity).await;
        if count > self.request_limit {
            self.blocklist.block(identity).await;
            self.security_log
                .emit(SecurityEventKind::RateLimitExceeded, identity, path);
            return Decision::RejectTooManyRequests;
        }

        // Step 4: suspicion heuristic
        if self.is_suspicious(identity, path).await {
            self.blocklist.block(identity).await;
            self.security_log
                .emit(SecurityEventKind::SuspiciousActivity, identity, path);
            return Decision::RejectForbidden;
        }

        debug!(identity, path, count, "request admitted");
        Decision::Admit
    }

    /// Whether an identity is on the trust list.
    pub fn is_trusted(&self, identity: &str) -> bool {
        self.trusted.contains(identity)
    }

    /// Suspicion heuristic: a counter far past the limit, or a known-bad
    /// path substring. Reads counter state, mutates nothing.
    pub async fn is_suspicious(&self, identity: &str, path: &str) -> bool {
        if self.counters.current(identity).await > self.request_limit * 2 {
            return true;
        }
        self.suspicious_paths.iter().any(|sp| path.contains(sp))
    }
}
