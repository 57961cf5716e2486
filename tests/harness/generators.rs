// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for attack simulation.

/// Generate a pool of client identities for testing.
pub fn generate_identities(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use the 198.51.100.0/24 documentation range first, spill into 203.0.113.0/24
            let block = if i < 256 { "198.51.100" } else { "203.0.113" };
            format!("{}.{}", block, i % 256)
        })
        .collect()
}

/// Generate a pool of ordinary request paths.
pub fn generate_paths(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("/goals/{}", i)).collect()
}

/// Paths that should trip the suspicion heuristic with the default
/// configuration.
pub fn suspicious_paths() -> Vec<&'static str> {
    vec![
        "/admin",
        "/admin/login",
        "/wp-login.php",
        "/.env",
        "/static/.env.bak",
        "/backup",
        "/backup/db.sql",
    ]
}

/// Forwarding-header variations that must all resolve to the same identity.
pub fn forwarded_header_variants() -> Vec<&'static str> {
    vec![
        "198.51.100.200",
        " 198.51.100.200",
        "198.51.100.200, 70.41.3.18",
        "198.51.100.200,70.41.3.18, 150.172.238.178",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_identities_unique() {
        let identities = generate_identities(300);
        assert_eq!(identities.len(), 300);
        let unique: std::collections::HashSet<_> = identities.iter().collect();
        assert_eq!(unique.len(), 300);
    }

    #[test]
    fn test_suspicious_paths_match_defaults() {
        let defaults = admission_guard::config::AdmissionConfig::default().suspicious_paths;
        for path in suspicious_paths() {
            assert!(
                defaults.iter().any(|sp| path.contains(sp.as_str())),
                "{path} does not match any default suspicious substring"
            );
        }
    }
}
