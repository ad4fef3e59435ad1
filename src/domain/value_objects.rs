//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Serialize, Serializer};
use std::net::IpAddr;

/// An IP address literal that has passed syntax validation.
///
/// The only constructor is [`ExtractedIp::parse`], so holding an
/// `ExtractedIp` proves the text is a well-formed IPv4 or IPv6 literal.
/// The original text is kept verbatim; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractedIp {
    literal: String,
    addr: IpAddr,
}

impl ExtractedIp {
    /// Validate `input` as an IPv4 dotted-quad or IPv6 colon-hex literal.
    ///
    /// # Examples
    /// ```
    /// use ipgeo::domain::value_objects::ExtractedIp;
    ///
    /// assert!(ExtractedIp::parse("1.2.3.4").is_some());
    /// assert!(ExtractedIp::parse("2001:db8::1").is_some());
    /// assert!(ExtractedIp::parse("1.2.3.4 - host").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let addr = input.parse::<IpAddr>().ok()?;
        Some(Self {
            literal: input.to_string(),
            addr,
        })
    }

    /// The literal exactly as the provider returned it.
    pub fn as_str(&self) -> &str {
        &self.literal
    }

    /// The parsed address, for database lookups.
    pub fn addr(&self) -> IpAddr {
        self.addr
    }
}

impl std::fmt::Display for ExtractedIp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.literal)
    }
}

impl Serialize for ExtractedIp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.literal)
    }
}
