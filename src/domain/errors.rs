//! Domain Errors
//!
//! Per-attempt failures are absorbed by the resolution service; only
//! [`ResolveError`] crosses the public boundary.

use std::time::Duration;

/// Response body did not match any recognised shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unrecognised response body ({reason}): {raw}")]
pub struct DecodeError {
    /// The body as it was handed to the parser
    pub raw: serde_json::Value,
    pub reason: &'static str,
}

impl DecodeError {
    pub fn new(raw: serde_json::Value, reason: &'static str) -> Self {
        Self { raw, reason }
    }
}

/// Failure of a single provider attempt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttemptError {
    /// Connection failure or non-2xx status
    #[error("transport error: {0}")]
    Transport(String),
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Body decoded but no recognised field held a value
    #[error("no ip in response from {url}: {response}")]
    IpUndefined {
        url: String,
        response: serde_json::Value,
    },
}

impl AttemptError {
    /// Timeouts and connection failures are both transport-class.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

/// Terminal failure of a whole resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The resolved address has no entry in the offline database
    #[error("no geo record for {ip}")]
    GeoNotFound { ip: String },
    #[error("all IP services are unavailable ({attempts} attempts failed)")]
    AllProvidersUnavailable { attempts: usize },
}
