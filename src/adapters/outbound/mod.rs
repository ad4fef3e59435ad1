mod maxmind_geo_resolver;
mod reqwest_ip_provider;

pub use maxmind_geo_resolver::MaxMindGeoResolver;
pub use reqwest_ip_provider::{AttemptOptions, ReqwestIpProvider, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT};
