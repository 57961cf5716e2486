// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Failure escalation pipeline.
//!
//! Accumulates recovered handler faults per identity. Crossing the error
//! threshold dispatches an outbound alert, blocks the identity and appends a
//! `SUSPICIOUS_IP_BLOCKED` event. Dispatch rides a bounded, retry-free queue
//! consumed by a single worker; delivery is best-effort and a failure never
//! reaches the reporting caller.
//!
//! The tally sweep removes only entries below the threshold. An identity
//! that reached the threshold stays in the tally, so every further fault
//! from it dispatches again.

use crate::blocklist::Blocklist;
use crate::config::AlertConfig;
use crate::events::{SecurityEventKind, SecurityLog};
use crate::identity;
use chrono::{DateTime, Utc};
use prometheus::IntCounter;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

const QUEUE_CAPACITY: usize = 32;
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Alert delivery error. Logged by the dispatch worker, never propagated.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("alert request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("alert endpoint answered {0}")]
    Status(StatusCode),
}

/// One outbound alert.
#[derive(Debug, Clone)]
struct Alert {
    context: String,
    identity: String,
    count: u32,
    timestamp: DateTime<Utc>,
}

impl Alert {
    fn text(&self) -> String {
        format!(
            "ALERT: High error rate detected!\n\
             Context: {}\n\
             IP: {}\n\
             Error count: {}\n\
             Time: {}",
            self.context,
            self.identity,
            self.count,
            self.timestamp.to_rfc3339()
        )
    }
}

/// Handle to the dispatch worker.
struct AlertNotifier {
    tx: mpsc::Sender<Alert>,
}

impl AlertNotifier {
    /// Spawn the dispatch worker. The worker exits when the pipeline (and
    /// with it the queue sender) is dropped.
    fn start(api_base: &str, bot_token: &str, chat_id: &str) -> Self {
        let (tx, mut rx) = mpsc::channel::<Alert>(QUEUE_CAPACITY);

        let endpoint = format!(
            "{}/bot{}/sendMessage",
            api_base.trim_end_matches('/'),
            bot_token
        );
        let chat_id = chat_id.to_string();
        let client = reqwest::Client::new();

        tokio::spawn(async move {
            while let Some(alert) = rx.recv().await {
                match deliver(&client, &endpoint, &chat_id, &alert).await {
                    Ok(()) => info!(identity = %alert.identity, "alert delivered"),
                    Err(err) => {
                        warn!(identity = %alert.identity, error = %err, "alert delivery failed")
                    }
                }
            }
        });

        Self { tx }
    }

    /// Enqueue without waiting. A full queue drops the alert.
    fn enqueue(&self, alert: Alert) {
        if let Err(err) = self.tx.try_send(alert) {
            warn!(error = %err, "alert queue full, alert dropped");
        }
    }
}

async fn deliver(
    client: &reqwest::Client,
    endpoint: &str,
    chat_id: &str,
    alert: &Alert,
) -> Result<(), AlertError> {
    let body = serde_json::json!({
        "chat_id": chat_id,
        "text": alert.text(),
    });

    let response = client
        .post(endpoint)
        .timeout(DELIVERY_TIMEOUT)
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AlertError::Status(response.status()));
    }
    Ok(())
}

/// Per-identity failure accounting with threshold-triggered alerting.
pub struct EscalationPipeline {
    tally: Mutex<HashMap<String, u32>>,
    threshold: u32,
    notifier: Option<AlertNotifier>,
    blocklist: Arc<Blocklist>,
    security_log: SecurityLog,
    alerts_sent: Option<IntCounter>,
}

impl EscalationPipeline {
    /// Create the pipeline. Dispatch is enabled only when the configuration
    /// carries both a bot token and a chat id; blocking and logging work
    /// regardless.
    pub fn new(config: AlertConfig, blocklist: Arc<Blocklist>, security_log: SecurityLog) -> Self {
        let notifier = if config.dispatch_configured() {
            let token = config.bot_token.as_deref().unwrap_or_default();
            let chat = config.chat_id.as_deref().unwrap_or_default();
            Some(AlertNotifier::start(&config.api_base, token, chat))
        } else {
            info!("alert credentials not configured, dispatch disabled");
            None
        };

        Self {
            tally: Mutex::new(HashMap::new()),
            threshold: config.error_threshold,
            notifier,
            blocklist,
            security_log,
            alerts_sent: None,
        }
    }

    /// Attach a counter incremented per dispatched alert.
    pub fn with_alert_counter(mut self, counter: IntCounter) -> Self {
        self.alerts_sent = Some(counter);
        self
    }

    /// Report one recovered fault attributed to `identity`.
    pub async fn report(&self, message: &str, context: &str, identity: &str) {
        let identity = identity::normalize(identity);
        info!(context, error = message, identity = %identity, "handler failure reported");

        let Some(notifier) = &self.notifier else {
            return;
        };

        let count = {
            let mut tally = self.tally.lock().await;
            let entry = tally.entry(identity.clone()).or_insert(0);
            *entry += 1;
            *entry
        };

        if count >= self.threshold {
            notifier.enqueue(Alert {
                context: context.to_string(),
                identity: identity.clone(),
                count,
                timestamp: Utc::now(),
            });
            if let Some(counter) = &self.alerts_sent {
                counter.inc();
            }
            self.blocklist.block(&identity).await;
            self.security_log
                .emit(SecurityEventKind::SuspiciousIpBlocked, &identity, "high_error_rate");
        }
    }

    /// Drop tally entries still below the threshold. Entries at or above it
    /// are kept, so an escalated identity keeps re-triggering dispatch.
    pub async fn sweep(&self) {
        let mut tally = self.tally.lock().await;
        let threshold = self.threshold;
        tally.retain(|_, count| *count >= threshold);
    }

    /// Current error count for an identity.
    pub async fn error_count(&self, identity: &str) -> u32 {
        self.tally
            .lock()
            .await
            .get(identity)
            .copied()
            .unwrap_or(0)
    }
}
