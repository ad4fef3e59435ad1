//! ipgeo Library
//!
//! Resolves the caller's public IP by racing a pool of redundant
//! "what is my IP" services, then geo-locates it against an offline
//! MaxMind database.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::outbound::{AttemptOptions, MaxMindGeoResolver, ReqwestIpProvider};
pub use application::ResolutionService;
pub use config::load_config;
pub use domain::entities::{GeoRecord, Provider, ResolutionResult};
pub use domain::errors::{AttemptError, DecodeError, ResolveError};
pub use domain::ports::{GeoResolver, IpProvider};
pub use domain::services::ServiceRegistry;
pub use domain::value_objects::ExtractedIp;
pub use infrastructure::RetryPolicy;
