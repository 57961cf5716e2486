// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Attack simulation patterns for security testing.

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Number of unique client identities to simulate
    pub unique_identities: usize,
    /// Whether requests target suspicious paths
    pub suspicious_paths: bool,
    /// Whether requests originate from a trusted identity
    pub from_trusted: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_identities: 1,
            suspicious_paths: false,
            from_trusted: false,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single identity flood - basic DoS from one origin.
    pub fn single_identity_flood() -> Self {
        Self {
            total_requests: 200,
            unique_identities: 1,
            ..Default::default()
        }
    }

    /// Distributed probe - many identities, each far below the limit.
    pub fn distributed_probe() -> Self {
        Self {
            total_requests: 200,
            unique_identities: 100,
            ..Default::default()
        }
    }

    /// Vulnerability scan - cycling known-bad paths.
    pub fn path_scan() -> Self {
        Self {
            total_requests: 50,
            unique_identities: 5,
            suspicious_paths: true,
            ..Default::default()
        }
    }

    /// Flood from the trust list - must pass untouched.
    pub fn trusted_flood() -> Self {
        Self {
            total_requests: 500,
            unique_identities: 1,
            from_trusted: true,
            ..Default::default()
        }
    }
}
