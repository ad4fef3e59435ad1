//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the ipgeo domain.
//! They have no external dependencies and contain only business logic.

use crate::domain::value_objects::ExtractedIp;
use serde::Serialize;

/// An upstream "what is my IP" endpoint.
///
/// Providers are loaded once from a fixed table and never change
/// for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Provider {
    /// Unique key for this provider (usually its host)
    pub name: String,
    /// Endpoint queried with a plain GET
    pub url: String,
}

impl Provider {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Geographic metadata for an IP address, from the offline database.
///
/// Every field except `ip` is optional because databases differ in
/// what they record for a given network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoRecord {
    pub ip: ExtractedIp,
    /// Matched network in CIDR notation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Country code (ISO 3166-1 alpha-2)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// First-level subdivision code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// IANA time zone name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// UTC offset in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl GeoRecord {
    /// Create a record that only knows its IP.
    pub fn new(ip: ExtractedIp) -> Self {
        Self {
            ip,
            range: None,
            country: None,
            region: None,
            city: None,
            lat: None,
            lon: None,
            timezone: None,
            offset: None,
            currency: None,
        }
    }
}

/// Terminal value of one successful resolution.
///
/// Built once when the race is won and the geo lookup succeeds;
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionResult {
    #[serde(flatten)]
    pub geo: GeoRecord,
    /// Name of the provider that won the race
    pub provider: String,
    pub provider_url: String,
    /// Outbound proxy the attempts went through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Number of race cycles run, including the winning one
    pub cycles: u32,
}

impl ResolutionResult {
    pub fn new(geo: GeoRecord, provider: &Provider, proxy: Option<String>, cycles: u32) -> Self {
        Self {
            geo,
            provider: provider.name.clone(),
            provider_url: provider.url.clone(),
            proxy,
            cycles,
        }
    }

    /// The resolved public IP.
    pub fn ip(&self) -> &ExtractedIp {
        &self.geo.ip
    }
}
