//! Service Registry
//!
//! Static catalog of IP providers and the randomized traversal order
//! used for each resolution.

use crate::domain::entities::Provider;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Providers that answer with a JSON object or a decorated text line.
const STRUCTURED_SERVICES: &[(&str, &str)] = &[
    ("wtfismyip.com", "https://wtfismyip.com/json"),
    ("myip.wtf", "https://myip.wtf/json"),
    ("api.my-ip.io/v2/ip.json", "https://api.my-ip.io/v2/ip.json"),
    ("check.torproject.org", "https://check.torproject.org/api/ip"),
    ("httpbin.org", "https://httpbin.org/ip"),
    ("ifconfig.pro", "https://ifconfig.pro/ip.host"),
    ("iphorse.com", "https://iphorse.com/json"),
    ("ipapi.co", "https://ipapi.co/json"),
    ("api.ip2location.io", "https://api.ip2location.io"),
    ("ifconfig.co", "https://ifconfig.co/json"),
];

/// Providers that answer with the bare address on one line.
const ONE_LINE_SERVICES: &[(&str, &str)] = &[
    ("ipaddr.site", "https://ipaddr.site"),
    ("checkip.amazonaws.com", "https://checkip.amazonaws.com"),
    ("ident.me", "https://ident.me"),
    ("whatismyip.akamai.com", "https://whatismyip.akamai.com"),
    ("ipv4.text.wtfismyip.com", "https://ipv4.text.wtfismyip.com"),
    ("ipify.org", "https://api.ipify.org"),
    ("l2.io", "https://l2.io/ip"),
    ("curlmyip.net", "https://curlmyip.net"),
    ("ifconfig.io/ip", "https://ifconfig.io/ip"),
    ("ifconfig.es", "https://ifconfig.es"),
    ("ipaddress.sh", "https://ipaddress.sh"),
    ("eth0.me", "https://eth0.me"),
    ("ipinfo.io/ip", "https://ipinfo.io/ip"),
    ("icanhazip.com", "https://icanhazip.com"),
    ("ip.liquidweb.com", "https://ip.liquidweb.com"),
];

/// Registry construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("provider list is empty")]
    Empty,
    #[error("duplicate provider name: {0}")]
    DuplicateName(String),
}

/// Read-only catalog of providers.
///
/// Never empty, and provider names are unique.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    providers: Vec<Provider>,
}

impl ServiceRegistry {
    /// Build a registry from an explicit provider list.
    pub fn new(providers: Vec<Provider>) -> Result<Self, RegistryError> {
        if providers.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(provider.name.as_str()) {
                return Err(RegistryError::DuplicateName(provider.name.clone()));
            }
        }

        Ok(Self { providers })
    }

    /// The built-in catalog of public providers.
    pub fn builtin() -> Self {
        let providers = STRUCTURED_SERVICES
            .iter()
            .chain(ONE_LINE_SERVICES)
            .map(|(name, url)| Provider::new(*name, *url))
            .collect();

        Self { providers }
    }

    /// Full catalog in declaration order.
    pub fn list(&self) -> &[Provider] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// A uniformly random permutation of the catalog.
    ///
    /// Each call shuffles afresh from `rng` (Fisher-Yates); nothing is
    /// remembered between calls.
    pub fn randomized_list<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Provider> {
        let mut providers = self.providers.clone();
        providers.shuffle(rng);
        providers
    }
}
