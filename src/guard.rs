// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Panic-safe handler execution.
//!
//! Wraps invocation of the downstream handler: a panic is caught at this
//! boundary, classified into a textual message, reported to the escalation
//! pipeline and converted into a `HandlerFault`. The original payload never
//! crosses the boundary, and neither does a fault raised by the pipeline
//! itself.

use crate::escalation::EscalationPipeline;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// A recovered downstream crash. Maps to a generic HTTP 500.
#[derive(Debug, Error)]
#[error("handler fault: {message}")]
pub struct HandlerFault {
    /// Classified panic payload
    pub message: String,
}

/// Executes handlers behind a recovery boundary.
#[derive(Clone)]
pub struct HandlerGuard {
    escalation: Arc<EscalationPipeline>,
}

impl HandlerGuard {
    pub fn new(escalation: Arc<EscalationPipeline>) -> Self {
        Self { escalation }
    }

    /// Run `handler` on behalf of `identity`.
    ///
    /// On a panic, the payload is classified, reported under `context`, and
    /// a `HandlerFault` is returned instead of resuming the unwind.
    pub async fn run<F, T>(&self, identity: &str, context: &str, handler: F) -> Result<T, HandlerFault>
    where
        F: Future<Output = T>,
    {
        match AssertUnwindSafe(handler).catch_unwind().await {
            Ok(value) => Ok(value),
            Err(payload) => {
                let message = fault_message(payload);
                error!(identity, context, message, "recovered handler panic");

                // Reporting must never unwind past this boundary either.
                let report = self.escalation.report(&message, context, identity);
                if AssertUnwindSafe(report).catch_unwind().await.is_err() {
                    error!(identity, "escalation pipeline panicked while reporting");
                }

                Err(HandlerFault { message })
            }
        }
    }
}

/// Classify a panic payload into a message: string payloads verbatim,
/// anything else a generic marker.
fn fault_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown fault".to_string()
    }
}
