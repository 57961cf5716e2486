// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Background sweep tasks.
//!
//! Two independent periodic tasks: one sweeps idle request counters and
//! expired block entries, one trims the error tally. Each store is swept
//! under its own lock; the sweeps are deliberately not one transaction.

use crate::blocklist::Blocklist;
use crate::config::{AdmissionConfig, AlertConfig};
use crate::counter::RequestCounters;
use crate::escalation::EscalationPipeline;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle over the spawned sweep tasks. Aborting them is the only
/// cancellation mechanism; `shutdown` (or drop) stops both.
pub struct Reaper {
    handles: Vec<JoinHandle<()>>,
}

impl Reaper {
    /// Spawn the sweep tasks for the given stores.
    pub fn spawn(
        counters: Arc<RequestCounters>,
        blocklist: Arc<Blocklist>,
        escalation: Arc<EscalationPipeline>,
        admission: &AdmissionConfig,
        alerts: &AlertConfig,
    ) -> Self {
        let handles = vec![
            spawn_store_sweep(counters, blocklist, admission.sweep_period(), admission.idle_eviction()),
            spawn_tally_sweep(escalation, alerts.tally_sweep_period()),
        ];
        Self { handles }
    }

    /// Stop all sweep tasks.
    pub fn shutdown(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_store_sweep(
    counters: Arc<RequestCounters>,
    blocklist: Arc<Blocklist>,
    period: Duration,
    idle_after: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            counters.sweep(idle_after).await;
            blocklist.sweep().await;
            debug!("store sweep complete");
        }
    })
}

fn spawn_tally_sweep(escalation: Arc<EscalationPipeline>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            escalation.sweep().await;
            debug!("error tally sweep complete");
        }
    })
}
