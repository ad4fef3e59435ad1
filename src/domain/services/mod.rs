pub mod response_parser;
pub mod service_registry;

pub use response_parser::IpInfoResponse;
pub use service_registry::{RegistryError, ServiceRegistry};
