// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Security event stream.
//!
//! Every blocking decision produces a structured record appended to an
//! external sink. The default sink writes `tracing` records under the
//! `security` target; deployments route that target to their audit log.
//! The stream is append-only and never read back by this crate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Kind of security event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityEventKind {
    /// A blocked identity attempted access
    BlockedAccess,
    /// An identity crossed the request limit
    RateLimitExceeded,
    /// The suspicion heuristic flagged a request
    SuspiciousActivity,
    /// The escalation pipeline blocked an identity
    SuspiciousIpBlocked,
}

impl fmt::Display for SecurityEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BlockedAccess => "BLOCKED_ACCESS",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::SuspiciousActivity => "SUSPICIOUS_ACTIVITY",
            Self::SuspiciousIpBlocked => "SUSPICIOUS_IP_BLOCKED",
        };
        f.write_str(s)
    }
}

/// A single security event record.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityEvent {
    pub kind: SecurityEventKind,
    pub identity: String,
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// Destination for security events.
pub trait EventSink: Send + Sync {
    fn append(&self, event: &SecurityEvent);
}

/// Default sink: structured `tracing` records under the `security` target.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn append(&self, event: &SecurityEvent) {
        warn!(
            target: "security",
            event = %event.kind,
            identity = %event.identity,
            path = %event.path,
            timestamp = %event.timestamp.to_rfc3339(),
            "security event"
        );
    }
}

/// Handle for emitting security events.
#[derive(Clone)]
pub struct SecurityLog {
    sink: Arc<dyn EventSink>,
}

impl SecurityLog {
    /// Create a log writing to the given sink.
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Emit one event, stamped with the current wall-clock time.
    pub fn emit(&self, kind: SecurityEventKind, identity: &str, path: &str) {
        self.sink.append(&SecurityEvent {
            kind,
            identity: identity.to_string(),
            path: path.to_string(),
            timestamp: Utc::now(),
        });
    }
}

impl Default for SecurityLog {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl fmt::Debug for SecurityLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityLog").finish_non_exhaustive()
    }
}
