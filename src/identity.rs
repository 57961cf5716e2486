// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client identity resolution.
//!
//! Produces the canonical string key all per-origin accounting hangs off:
//! the first hop of a forwarding header when one is present, otherwise the
//! peer address with its port stripped. Both functions are pure.

/// Resolve a client identity from request metadata.
///
/// A forwarding header (`X-Forwarded-For`) wins over the raw peer address;
/// its first comma-separated entry is the original client.
pub fn resolve(forwarded_for: Option<&str>, peer_addr: &str) -> String {
    if let Some(forwarded) = forwarded_for {
        let first = forwarded.split(',').next().unwrap_or(forwarded).trim();
        if !first.is_empty() {
            return normalize(first);
        }
    }
    normalize(peer_addr)
}

/// Normalize a raw address into a canonical identity.
///
/// Idempotent: normalizing an already-normalized identity returns it
/// unchanged. The IPv6 loopback collapses to the IPv4 form so both spellings
/// count as one identity. A bracketed address (`[addr]:port`) loses brackets
/// and port; `host:port` loses the port. An unbracketed address with two or
/// more colons is a bare IPv6 address and passes through intact.
pub fn normalize(raw: &str) -> String {
    let raw = raw.trim();

    if raw == "::1" || raw == "[::1]" {
        return "127.0.0.1".to_string();
    }

    // [addr]:port or [addr]
    if let Some(rest) = raw.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            let inner = &rest[..end];
            if inner == "::1" {
                return "127.0.0.1".to_string();
            }
            return inner.to_string();
        }
    }

    // host:port, but never a bare IPv6 address
    if raw.matches(':').count() == 1 {
        if let Some((host, _port)) = raw.rsplit_once(':') {
            if !host.is_empty() {
                return host.to_string();
            }
        }
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_header_wins() {
        assert_eq!(
            resolve(Some("203.0.113.7, 70.41.3.18"), "10.0.0.2:4711"),
            "203.0.113.7"
        );
        assert_eq!(resolve(Some(" 203.0.113.7 "), "10.0.0.2:4711"), "203.0.113.7");
    }

    #[test]
    fn test_peer_addr_fallback() {
        assert_eq!(resolve(None, "192.168.1.50:59001"), "192.168.1.50");
        assert_eq!(resolve(Some(""), "192.168.1.50:59001"), "192.168.1.50");
    }

    #[test]
    fn test_strip_port_forms() {
        assert_eq!(normalize("192.168.1.50:8080"), "192.168.1.50");
        assert_eq!(normalize("[2001:db8::1]:8080"), "2001:db8::1");
        assert_eq!(normalize("example.internal:443"), "example.internal");
    }

    #[test]
    fn test_bare_ipv6_untouched() {
        assert_eq!(normalize("2001:db8::1"), "2001:db8::1");
    }

    #[test]
    fn test_loopback_collapses() {
        assert_eq!(normalize("::1"), "127.0.0.1");
        assert_eq!(normalize("[::1]"), "127.0.0.1");
        assert_eq!(normalize("[::1]:9090"), "127.0.0.1");
        assert_eq!(normalize("127.0.0.1"), "127.0.0.1");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["::1", "[::1]:443", "10.1.2.3:80", "2001:db8::1", "host:80"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {raw}");
        }
    }
}
