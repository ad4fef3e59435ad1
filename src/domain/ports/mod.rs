mod geo_resolver;
mod ip_provider;

pub use geo_resolver::GeoResolver;
pub use ip_provider::IpProvider;
