// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the admission guard.
//!
//! Defaults reproduce the reference ingress policy: 100 requests per
//! counting window, one-hour blocks, a five-error escalation threshold.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the admission guard service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Admission control configuration
    #[serde(default)]
    pub admission: AdmissionConfig,

    /// Alerting configuration
    #[serde(default)]
    pub alerts: AlertConfig,
}

/// Admission control knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Maximum requests per identity within the counting window (default: 100)
    #[serde(default = "default_request_limit")]
    pub request_limit: u32,

    /// How long a blocked identity stays blocked, in seconds (default: 3600)
    #[serde(default = "default_block_secs")]
    pub block_secs: u64,

    /// Idle time after which a request counter is evicted, in seconds (default: 600)
    #[serde(default = "default_idle_evict_secs")]
    pub idle_evict_secs: u64,

    /// Period of the counter/blocklist sweep task, in seconds (default: 300)
    #[serde(default = "default_sweep_secs")]
    pub sweep_secs: u64,

    /// Identities exempt from all limits and blocking
    #[serde(default = "default_trusted")]
    pub trusted: Vec<String>,

    /// Path substrings that mark a request as suspicious
    #[serde(default = "default_suspicious_paths")]
    pub suspicious_paths: Vec<String>,
}

/// Outbound alerting configuration.
///
/// Dispatch is disabled unless both `bot_token` and `chat_id` are set;
/// blocking and logging stay active either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Bot token for the notification API (default: unset)
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chat id the alert is delivered to (default: unset)
    #[serde(default)]
    pub chat_id: Option<String>,

    /// Error count at which an identity is escalated (default: 5)
    #[serde(default = "default_error_threshold")]
    pub error_threshold: u32,

    /// Period of the error-tally sweep task, in seconds (default: 60)
    #[serde(default = "default_tally_sweep_secs")]
    pub tally_sweep_secs: u64,

    /// Base URL of the notification API (default: Telegram)
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_request_limit() -> u32 {
    100
}

fn default_block_secs() -> u64 {
    3600 // 1 hour
}

fn default_idle_evict_secs() -> u64 {
    600 // 10 minutes
}

fn default_sweep_secs() -> u64 {
    300 // 5 minutes
}

fn default_trusted() -> Vec<String> {
    vec![
        "127.0.0.1".to_string(),
        "::1".to_string(),
        "10.0.0.1".to_string(),
    ]
}

fn default_suspicious_paths() -> Vec<String> {
    vec![
        "/admin".to_string(),
        "/wp-login.php".to_string(),
        "/.env".to_string(),
        "/backup".to_string(),
    ]
}

fn default_error_threshold() -> u32 {
    5
}

fn default_tally_sweep_secs() -> u64 {
    60
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            admission: AdmissionConfig::default(),
            alerts: AlertConfig::default(),
        }
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            request_limit: default_request_limit(),
            block_secs: default_block_secs(),
            idle_evict_secs: default_idle_evict_secs(),
            sweep_secs: default_sweep_secs(),
            trusted: default_trusted(),
            suspicious_paths: default_suspicious_paths(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            error_threshold: default_error_threshold(),
            tally_sweep_secs: default_tally_sweep_secs(),
            api_base: default_api_base(),
        }
    }
}

impl AdmissionConfig {
    /// Get the block duration
    pub fn block_duration(&self) -> Duration {
        Duration::from_secs(self.block_secs)
    }

    /// Get the counter idle-eviction window
    pub fn idle_eviction(&self) -> Duration {
        Duration::from_secs(self.idle_evict_secs)
    }

    /// Get the store sweep period
    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_secs)
    }
}

impl AlertConfig {
    /// Get the tally sweep period
    pub fn tally_sweep_period(&self) -> Duration {
        Duration::from_secs(self.tally_sweep_secs)
    }

    /// Whether both credentials required for dispatch are present.
    pub fn dispatch_configured(&self) -> bool {
        matches!((&self.bot_token, &self.chat_id), (Some(t), Some(c)) if !t.is_empty() && !c.is_empty())
    }
}
