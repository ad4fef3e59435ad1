//! IP Provider Port
//!
//! Defines the interface for asking one upstream service for the caller's IP.

use crate::domain::entities::Provider;
use crate::domain::errors::AttemptError;
use crate::domain::value_objects::ExtractedIp;
use async_trait::async_trait;

/// A single query against a single provider.
///
/// Implementations perform exactly one outbound request and never retry;
/// fallback across providers is the resolution service's job.
#[async_trait]
pub trait IpProvider: Send + Sync {
    /// Query `provider` and extract a validated IP from its response.
    async fn attempt(&self, provider: &Provider) -> Result<ExtractedIp, AttemptError>;

    /// Outbound proxy the attempts go through, if any.
    fn proxy(&self) -> Option<&str> {
        None
    }
}
