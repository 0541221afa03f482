//! Backend endpoint declaration in the mobile app's configuration source
//!
//! The Flutter app reaches the backend through a single Dart declaration:
//!
//! ```dart
//! static const String baseUrl = 'http://192.168.1.50:3000';
//! ```
//!
//! The host segment is the only variable part. The port is fixed.

use regex::{Captures, Regex};
use std::net::IpAddr;
use std::sync::LazyLock;

/// Port the backend API listens on
pub const API_PORT: u16 = 3000;

/// Matches the declaration with any previous host (IPv4, bracketed IPv6, or a name).
static BASE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(static const String baseUrl = 'http://)([^'/\s]+?)(:{}';)",
        API_PORT
    ))
    .expect("Invalid baseUrl pattern regex")
});

/// Result of applying the endpoint patch to a file's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The declaration pointed elsewhere; holds the rewritten content
    Updated(String),
    /// The declaration already points at the requested host
    Unchanged,
    /// No declaration matched the expected shape
    NotFound,
}

/// Render an address as it must appear inside a URL authority.
///
/// IPv6 literals are bracketed; IPv4 literals and host names pass through.
pub fn url_host(address: &str) -> String {
    match address.parse::<IpAddr>() {
        Ok(IpAddr::V6(v6)) => format!("[{}]", v6),
        _ => address.to_string(),
    }
}

/// Full backend base URL for an address, e.g. `http://10.0.0.5:3000`
pub fn base_url(address: &str) -> String {
    format!("http://{}:{}", url_host(address), API_PORT)
}

/// Point the `baseUrl` declaration in `content` at `address`.
///
/// Only the host segment of the matched declaration changes.
pub fn patch_base_url(content: &str, address: &str) -> PatchOutcome {
    if !BASE_URL_PATTERN.is_match(content) {
        return PatchOutcome::NotFound;
    }

    let host = url_host(address);
    let patched = BASE_URL_PATTERN.replace_all(content, |caps: &Captures| {
        format!("{}{}{}", &caps[1], host, &caps[3])
    });

    if patched == content {
        PatchOutcome::Unchanged
    } else {
        PatchOutcome::Updated(patched.into_owned())
    }
}

/// Current host of the declaration, if present
pub fn current_host(content: &str) -> Option<&str> {
    BASE_URL_PATTERN
        .captures(content)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}
