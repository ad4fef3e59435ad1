//! MaxMind GeoIP Resolver
//!
//! Implements GeoResolver using a MaxMind GeoLite2/GeoIP2 database file.
//! City databases fill every field; Country databases only the country.

use crate::domain::entities::GeoRecord;
use crate::domain::ports::GeoResolver;
use crate::domain::value_objects::ExtractedIp;
use maxminddb::{MaxMindDBError, Reader};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// MaxMind GeoIP resolver.
///
/// The database is read fully into memory and shared behind an `Arc`,
/// so lookups never block on disk.
#[derive(Clone)]
pub struct MaxMindGeoResolver {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindGeoResolver {
    /// Load a GeoIP database from a file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    /// Load a GeoIP database already held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> anyhow::Result<Self> {
        let reader = Reader::from_source(bytes)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    /// Database type as recorded in its metadata, e.g. `GeoLite2-City`.
    pub fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }
}

impl GeoResolver for MaxMindGeoResolver {
    fn resolve(&self, ip: &ExtractedIp) -> Option<GeoRecord> {
        #[derive(Debug, Deserialize)]
        struct Country {
            iso_code: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct Subdivision {
            iso_code: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct City {
            names: Option<BTreeMap<String, String>>,
        }

        #[derive(Debug, Deserialize)]
        struct Location {
            latitude: Option<f64>,
            longitude: Option<f64>,
            time_zone: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct CityResp {
            country: Option<Country>,
            registered_country: Option<Country>,
            subdivisions: Option<Vec<Subdivision>>,
            city: Option<City>,
            location: Option<Location>,
        }

        let (resp, prefix_len): (CityResp, usize) = match self.reader.lookup_prefix(ip.addr()) {
            Ok(found) => found,
            Err(MaxMindDBError::AddressNotFoundError(_)) => return None,
            Err(e) => {
                tracing::warn!("geo lookup for {} failed: {}", ip, e);
                return None;
            }
        };

        let mut geo = GeoRecord::new(ip.clone());
        geo.range = Some(network_cidr(ip.addr(), prefix_len));

        // Some ranges only carry the registrant's country
        geo.country = resp
            .country
            .and_then(|c| c.iso_code)
            .or_else(|| resp.registered_country.and_then(|c| c.iso_code));
        geo.region = resp
            .subdivisions
            .and_then(|subs| subs.into_iter().next())
            .and_then(|s| s.iso_code);
        geo.city = resp
            .city
            .and_then(|c| c.names)
            .and_then(|mut names| names.remove("en"));

        if let Some(location) = resp.location {
            geo.lat = location.latitude;
            geo.lon = location.longitude;
            geo.timezone = location.time_zone;
        }

        Some(geo)
    }
}

/// Network containing `addr` with the given prefix, in CIDR notation.
fn network_cidr(addr: IpAddr, prefix_len: usize) -> String {
    match addr {
        IpAddr::V4(v4) => {
            // IPv4 lookups in an IPv6 tree report the prefix within ::/96
            let prefix = if prefix_len > 32 {
                prefix_len.saturating_sub(96).min(32)
            } else {
                prefix_len
            };
            let mask = u32::MAX.checked_shl(32 - prefix as u32).unwrap_or(0);
            format!("{}/{}", Ipv4Addr::from(u32::from(v4) & mask), prefix)
        }
        IpAddr::V6(v6) => {
            let prefix = prefix_len.min(128);
            let mask = u128::MAX.checked_shl(128 - prefix as u32).unwrap_or(0);
            format!("{}/{}", Ipv6Addr::from(u128::from(v6) & mask), prefix)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;

    const TEST_DB: &[u8] = include_bytes!("../../../tests/data/GeoIP2-City-Test.mmdb");

    fn test_database() -> MaxMindGeoResolver {
        MaxMindGeoResolver::from_bytes(TEST_DB.to_vec()).unwrap()
    }

    fn ip(s: &str) -> ExtractedIp {
        ExtractedIp::parse(s).unwrap()
    }

    #[test]
    fn test_from_file_nonexistent() {
        let result = MaxMindGeoResolver::from_file("/nonexistent/path/GeoLite2.mmdb");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_not_a_database() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not an mmdb file").unwrap();

        let result = MaxMindGeoResolver::from_file(file.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_from_bytes_empty() {
        assert!(MaxMindGeoResolver::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MaxMindGeoResolver>();
    }

    // ===== network_cidr =====

    #[test]
    fn test_network_cidr_ipv4() {
        let addr: IpAddr = "8.8.8.8".parse().unwrap();
        assert_eq!(network_cidr(addr, 24), "8.8.8.0/24");
        assert_eq!(network_cidr(addr, 32), "8.8.8.8/32");
        assert_eq!(network_cidr(addr, 0), "0.0.0.0/0");
    }

    #[test]
    fn test_network_cidr_ipv4_in_ipv6_tree() {
        let addr: IpAddr = "8.8.8.8".parse().unwrap();
        assert_eq!(network_cidr(addr, 96 + 16), "8.8.0.0/16");
    }

    #[test]
    fn test_network_cidr_ipv6() {
        let addr: IpAddr = "2001:db8:abcd:12::1".parse().unwrap();
        assert_eq!(network_cidr(addr, 48), "2001:db8:abcd::/48");
        assert_eq!(network_cidr(addr, 128), "2001:db8:abcd:12::1/128");
        assert_eq!(network_cidr(addr, 0), "::/0");
    }

    // ===== Lookups =====

    #[test]
    fn test_database_type() {
        assert_eq!(test_database().database_type(), "GeoIP2-City");
    }

    #[test]
    fn test_from_file_loads_database() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/GeoIP2-City-Test.mmdb");
        let resolver = MaxMindGeoResolver::from_file(path).unwrap();
        assert!(resolver.resolve(&ip("81.2.69.170")).is_some());
    }

    #[test]
    fn test_resolve_city_record() {
        let geo = test_database().resolve(&ip("81.2.69.170")).unwrap();

        assert_eq!(geo.ip.as_str(), "81.2.69.170");
        assert_eq!(geo.range.as_deref(), Some("81.2.69.160/27"));
        assert_eq!(geo.country.as_deref(), Some("GB"));
        assert_eq!(geo.region.as_deref(), Some("ENG"));
        assert_eq!(geo.city.as_deref(), Some("London"));
        assert_eq!(geo.lat, Some(51.5142));
        assert_eq!(geo.lon, Some(-0.0931));
        assert_eq!(geo.timezone.as_deref(), Some("Europe/London"));
        assert!(geo.offset.is_none());
        assert!(geo.currency.is_none());
    }

    #[test]
    fn test_resolve_ipv6_record() {
        let geo = test_database().resolve(&ip("2001:480::1")).unwrap();

        assert_eq!(geo.range.as_deref(), Some("2001:480::/32"));
        assert_eq!(geo.country.as_deref(), Some("US"));
        assert_eq!(geo.region.as_deref(), Some("CA"));
        assert_eq!(geo.city.as_deref(), Some("San Diego"));
        assert_eq!(geo.timezone.as_deref(), Some("America/Los_Angeles"));
    }

    #[test]
    fn test_resolve_falls_back_to_registered_country() {
        let geo = test_database().resolve(&ip("89.160.20.120")).unwrap();

        assert_eq!(geo.country.as_deref(), Some("SE"));
        assert_eq!(geo.range.as_deref(), Some("89.160.20.112/28"));
        assert_eq!(geo.timezone.as_deref(), Some("Europe/Stockholm"));
        assert!(geo.region.is_none());
        assert!(geo.city.is_none());
    }

    #[test]
    fn test_resolve_record_without_country_is_found() {
        let geo = test_database().resolve(&ip("67.43.156.1")).unwrap();

        assert!(geo.country.is_none());
        assert_eq!(geo.range.as_deref(), Some("67.43.156.0/24"));
        assert_eq!(geo.lat, Some(0.0));
        assert_eq!(geo.lon, Some(0.0));
    }

    #[test]
    fn test_resolve_unknown_ip_returns_none() {
        let resolver = test_database();

        for missing in ["192.168.1.1", "10.0.0.1", "127.0.0.1", "8.8.8.8", "::1", "2001:db8::1"] {
            assert!(resolver.resolve(&ip(missing)).is_none(), "{}", missing);
        }
    }
}
