//! Application Layer
//!
//! Use cases that wire domain services and ports together.

pub mod resolution_service;

pub use resolution_service::{ResolutionService, DEFAULT_ATTEMPT_TIMEOUT};
