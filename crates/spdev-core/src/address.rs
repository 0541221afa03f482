//! Detected local network address

use std::fmt;
use std::net::IpAddr;

/// Host written to the mobile config when detection fails
pub const FALLBACK_HOST: &str = "localhost";

/// Best-effort address of this machine on the local network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedAddress {
    /// Reported by the platform interface query (`ipconfig getifaddr`)
    Interface(IpAddr),
    /// Read back from a connected UDP socket
    Socket(IpAddr),
    /// Detection failed; `host` is the sentinel
    Fallback { host: String, reason: String },
}

impl DetectedAddress {
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self::Fallback {
            host: FALLBACK_HOST.to_string(),
            reason: reason.into(),
        }
    }

    /// Address as a plain string (no URL brackets)
    pub fn host(&self) -> String {
        match self {
            DetectedAddress::Interface(ip) | DetectedAddress::Socket(ip) => ip.to_string(),
            DetectedAddress::Fallback { host, .. } => host.clone(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DetectedAddress::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            DetectedAddress::Fallback { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for DetectedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedAddress::Interface(ip) | DetectedAddress::Socket(ip) => write!(f, "{}", ip),
            DetectedAddress::Fallback { host, .. } => write!(f, "{}", host),
        }
    }
}
