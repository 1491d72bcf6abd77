// src/extractor/sanitize.rs
// =============================================================================
// This module implements the default URL safety policy.
//
// Comment text comes from strangers, so a resolved URL is not automatically a
// URL we want to surface. The policy either returns an accepted canonical
// form or rejects the URL outright; the extractor uses it purely as a filter.
//
// What gets rejected:
// - Anything that doesn't re-parse as an absolute URL
//   (e.g. `http://127.0.0.1:8080"` - the stray quote corrupts the port)
// - Schemes outside the allowlist (no javascript:, data:, file:, ...)
// - Raw control characters anywhere in the string
// - Malformed percent-encoding (a `%` not followed by two hex digits)
//
// The allowlist matches the safe-protocol set commonly used when rendering
// untrusted Markdown: http, https, mailto, irc, ircs, xmpp.
// =============================================================================

use url::Url;

// Schemes we are willing to surface to users
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "irc", "ircs", "xmpp"];

// Applies the default safety policy to a candidate URL.
//
// Returns Some(canonical_url) when the URL is acceptable, None when it
// should be dropped. The canonical form is the `url` crate's serialization
// of the parsed URL, so accepted output is always well-formed.
pub fn default_url_policy(url: &str) -> Option<String> {
    // Control characters never belong in a URL we display
    if url.chars().any(|c| c.is_control()) {
        return None;
    }

    // Every '%' must start a well-formed two-hex-digit escape
    if !valid_percent_encoding(url) {
        return None;
    }

    // Must parse as an absolute URL on its own
    let parsed = Url::parse(url).ok()?;

    if !SAFE_SCHEMES.contains(&parsed.scheme()) {
        return None;
    }

    Some(parsed.to_string())
}

// Checks that every '%' in the string begins a valid percent escape.
fn valid_percent_encoding(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_https() {
        assert_eq!(
            default_url_policy("https://example.org/foo"),
            Some("https://example.org/foo".to_string())
        );
    }

    #[test]
    fn test_accepts_mailto() {
        assert!(default_url_policy("mailto:user@example.org").is_some());
    }

    #[test]
    fn test_canonicalizes_missing_path() {
        // The url crate serializes a bare origin with a trailing slash
        assert_eq!(
            default_url_policy("https://example.org"),
            Some("https://example.org/".to_string())
        );
    }

    #[test]
    fn test_rejects_javascript_scheme() {
        assert!(default_url_policy("javascript:alert(1)").is_none());
    }

    #[test]
    fn test_rejects_data_scheme() {
        assert!(default_url_policy("data:text/html,hi").is_none());
    }

    #[test]
    fn test_rejects_corrupted_port() {
        // A trailing quote glued onto the port makes this unparseable
        assert!(default_url_policy("http://127.0.0.1:8080\"").is_none());
    }

    #[test]
    fn test_rejects_control_characters() {
        assert!(default_url_policy("https://example.org/\u{0001}x").is_none());
    }

    #[test]
    fn test_rejects_malformed_percent_encoding() {
        assert!(default_url_policy("https://example.org/%zz").is_none());
        assert!(default_url_policy("https://example.org/%2").is_none());
    }

    #[test]
    fn test_accepts_valid_percent_encoding() {
        assert!(default_url_policy("https://example.org/a%20b").is_some());
    }

    #[test]
    fn test_rejects_relative_url() {
        // The policy runs after resolution; anything still relative is out
        assert!(default_url_policy("/foo/bar").is_none());
    }
}
