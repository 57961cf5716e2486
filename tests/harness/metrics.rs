// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for attack simulation results.

use std::collections::HashMap;

/// Possible outcomes for a simulated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Admitted,
    RateLimited,
    Forbidden,
}

/// Collects outcomes during an attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    outcomes: HashMap<Outcome, usize>,
    requests_per_identity: HashMap<String, usize>,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request outcome.
    pub fn record(&mut self, outcome: Outcome, identity: &str) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self
            .requests_per_identity
            .entry(identity.to_string())
            .or_insert(0) += 1;
    }

    /// Get total request count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Get block rate (ratio of rejected to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        let admitted = self.count(Outcome::Admitted);
        (total - admitted) as f64 / total as f64
    }

    /// Get number of unique identities that made requests.
    pub fn unique_identities(&self) -> usize {
        self.requests_per_identity.len()
    }
}

impl std::fmt::Display for AttackMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Attack Metrics ===")?;
        writeln!(f, "Total Requests:  {}", self.total_requests())?;
        writeln!(f, "Admitted:        {}", self.count(Outcome::Admitted))?;
        writeln!(f, "Rate Limited:    {}", self.count(Outcome::RateLimited))?;
        writeln!(f, "Forbidden:       {}", self.count(Outcome::Forbidden))?;
        writeln!(f, "Block Rate:      {:.1}%", self.block_rate() * 100.0)?;
        writeln!(f, "Unique Clients:  {}", self.unique_identities())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();
        metrics.record(Outcome::Admitted, "198.51.100.1");
        metrics.record(Outcome::Admitted, "198.51.100.1");
        metrics.record(Outcome::RateLimited, "198.51.100.1");
        metrics.record(Outcome::Forbidden, "198.51.100.2");

        assert_eq!(metrics.total_requests(), 4);
        assert_eq!(metrics.count(Outcome::Admitted), 2);
        assert_eq!(metrics.count(Outcome::RateLimited), 1);
        assert_eq!(metrics.count(Outcome::Forbidden), 1);
        assert_eq!(metrics.unique_identities(), 2);
        assert!((metrics.block_rate() - 0.5).abs() < 1e-9);
    }
}
