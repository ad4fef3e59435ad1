//! GeoIP Resolver Port
//!
//! Defines the interface for resolving IP addresses to geographic locations.

use crate::domain::entities::GeoRecord;
use crate::domain::value_objects::ExtractedIp;

/// Resolver for IP address to geographic location.
///
/// This is an outbound port that abstracts the offline GeoIP database.
/// Lookups are synchronous and must not touch the network.
pub trait GeoResolver: Send + Sync {
    /// Resolve an IP address to geographic information.
    ///
    /// Returns None if the database has no entry for the address
    /// (private, reserved or simply unknown ranges).
    fn resolve(&self, ip: &ExtractedIp) -> Option<GeoRecord>;
}
