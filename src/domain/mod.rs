//! Domain Layer
//!
//! Core types, ports and pure services. Nothing in here performs I/O.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{GeoRecord, Provider, ResolutionResult};
pub use errors::{AttemptError, DecodeError, ResolveError};
pub use value_objects::ExtractedIp;
