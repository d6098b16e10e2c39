//! Redirect target sanitization
//!
//! Login and registration accept a caller-supplied "next" URL to return to
//! after authenticating. Left unchecked, that parameter turns the gateway
//! into an open redirector toward attacker-controlled hosts. The check here
//! resolves the candidate against the request's own origin and only accepts
//! same-origin http/https targets.

use url::Url;

use crate::error::AuthError;

/// Check whether a redirect target is safe for the given request origin
///
/// The candidate is resolved against `origin` (so relative paths like
/// `/dashboard` are accepted) and must end up on the exact same network
/// location with an http or https scheme. The `url` crate normalizes away
/// explicit default ports, so `http://host:80` and `http://host` compare
/// equal.
pub fn is_safe_target(candidate: &str, origin: &Url) -> bool {
    let Ok(resolved) = origin.join(candidate) else {
        return false;
    };

    matches!(resolved.scheme(), "http" | "https")
        && resolved.host_str() == origin.host_str()
        && resolved.port() == origin.port()
}

/// Resolve an optional `next` parameter into a redirect decision
///
/// Absent or empty means "no redirect requested" (`Ok(None)`), not a
/// failure. A present but off-origin target is rejected outright with
/// [`AuthError::UnsafeRedirect`] so the attempt is visible to operators.
pub fn safe_redirect_target<'a>(
    candidate: Option<&'a str>,
    origin: &Url,
) -> Result<Option<&'a str>, AuthError> {
    match candidate {
        None => Ok(None),
        Some("") => Ok(None),
        Some(target) if is_safe_target(target, origin) => Ok(Some(target)),
        Some(target) => {
            tracing::warn!(target, "rejected unsafe redirect target");
            Err(AuthError::UnsafeRedirect)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    // Test 1: relative paths are safe
    #[test]
    fn test_relative_path_is_safe() {
        assert!(is_safe_target("/dashboard", &origin("https://app.example")));
        assert!(is_safe_target("secret", &origin("http://127.0.0.1:5000/")));
    }

    // Test 2: absolute same-origin URLs are safe
    #[test]
    fn test_same_origin_absolute_is_safe() {
        assert!(is_safe_target(
            "https://app.example/secret",
            &origin("https://app.example")
        ));
    }

    // Test 3: off-origin hosts are unsafe
    #[test]
    fn test_foreign_host_is_unsafe() {
        assert!(!is_safe_target(
            "https://evil.example/x",
            &origin("https://app.example")
        ));
    }

    // Test 4: scheme-relative URLs cannot smuggle a foreign host
    #[test]
    fn test_protocol_relative_is_unsafe() {
        assert!(!is_safe_target(
            "//evil.example/x",
            &origin("https://app.example")
        ));
    }

    // Test 5: non-web schemes are unsafe even on the same host
    #[test]
    fn test_non_http_scheme_is_unsafe() {
        assert!(!is_safe_target(
            "javascript:alert(1)",
            &origin("https://app.example")
        ));
        assert!(!is_safe_target(
            "ftp://app.example/file",
            &origin("https://app.example")
        ));
    }

    // Test 6: a differing port is a different network location
    #[test]
    fn test_different_port_is_unsafe() {
        assert!(!is_safe_target(
            "http://127.0.0.1:8080/secret",
            &origin("http://127.0.0.1:5000")
        ));
    }

    // Test 7: explicit default port compares equal to no port
    #[test]
    fn test_default_port_normalized() {
        assert!(is_safe_target(
            "http://app.example:80/home",
            &origin("http://app.example")
        ));
    }

    // Test 8: absent or empty target means "no redirect", present unsafe
    // target is a hard error
    #[test]
    fn test_safe_redirect_target_resolution() {
        let origin = origin("https://app.example");

        assert_eq!(safe_redirect_target(None, &origin).unwrap(), None);
        assert_eq!(safe_redirect_target(Some(""), &origin).unwrap(), None);
        assert_eq!(
            safe_redirect_target(Some("/secret"), &origin).unwrap(),
            Some("/secret")
        );
        assert!(matches!(
            safe_redirect_target(Some("https://evil.example/x"), &origin),
            Err(AuthError::UnsafeRedirect)
        ));
    }
}
