//! Response Parser
//!
//! Normalizes the heterogeneous bodies returned by IP providers into a
//! single validated [`ExtractedIp`].
//!
//! Bodies arrive as JSON. Text responses are wrapped as `{"raw": "<text>"}`
//! by the caller (see [`wrap_text`]) so that one decoder handles both.
//! Decoding tries a fixed list of rules in order and the first match wins:
//!
//! 1. the first non-empty value among [`IP_FIELDS`], which must be an IP literal
//! 2. the trimmed `raw` string as an IP literal
//! 3. the part of `raw` before `" - "` as an IP literal
//!
//! A bare JSON string is treated like `raw`.

use crate::domain::errors::DecodeError;
use crate::domain::value_objects::ExtractedIp;
use serde_json::{Map, Value};

/// Field names providers use for "the caller's IP", in priority order.
pub const IP_FIELDS: [&str; 5] = ["YourFuckingIPAddress", "origin", "IP", "ip", "remote_addr"];

/// Key under which text bodies are wrapped.
pub const RAW_FIELD: &str = "raw";

/// Separator used by providers that append a hostname to the address.
pub const HOST_SEPARATOR: &str = " - ";

/// Which decode rule matched a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpInfoResponse {
    /// A known JSON field carried the address
    Field {
        name: &'static str,
        ip: ExtractedIp,
    },
    /// A text body (or bare JSON string) carried the address
    Raw(ExtractedIp),
    /// A JSON object with none of the known fields set
    Empty,
}

impl IpInfoResponse {
    pub fn into_ip(self) -> Option<ExtractedIp> {
        match self {
            Self::Field { ip, .. } | Self::Raw(ip) => Some(ip),
            Self::Empty => None,
        }
    }
}

/// Wrap a text body so it decodes through the `raw` rule.
pub fn wrap_text(text: &str) -> Value {
    let mut map = Map::new();
    map.insert(RAW_FIELD.to_string(), Value::String(text.trim().to_string()));
    Value::Object(map)
}

/// Decode a body into the rule it matches.
///
/// Returns [`IpInfoResponse::Empty`] for objects that are structurally fine
/// but carry no address; callers decide whether that is an error.
pub fn decode(body: &Value) -> Result<IpInfoResponse, DecodeError> {
    match body {
        Value::Object(map) => decode_object(body, map),
        Value::String(text) => parse_raw(text)
            .map(IpInfoResponse::Raw)
            .ok_or_else(|| DecodeError::new(body.clone(), "text is not an ip literal")),
        _ => Err(DecodeError::new(body.clone(), "unsupported body type")),
    }
}

/// Extract the IP from a body, treating a missing address as a decode failure.
pub fn parse(body: &Value) -> Result<ExtractedIp, DecodeError> {
    decode(body)?
        .into_ip()
        .ok_or_else(|| DecodeError::new(body.clone(), "no ip field"))
}

/// Validate a text response.
///
/// Accepts `"<ip>"` or `"<ip> - <anything>"`, surrounded by any whitespace.
pub fn parse_raw(text: &str) -> Option<ExtractedIp> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    ExtractedIp::parse(trimmed).or_else(|| {
        let (head, _) = trimmed.split_once(HOST_SEPARATOR)?;
        ExtractedIp::parse(head)
    })
}

fn decode_object(body: &Value, map: &Map<String, Value>) -> Result<IpInfoResponse, DecodeError> {
    for name in IP_FIELDS {
        match map.get(name) {
            None | Some(Value::Null) => continue,
            Some(Value::String(value)) if value.is_empty() => continue,
            Some(Value::String(value)) => {
                return ExtractedIp::parse(value)
                    .map(|ip| IpInfoResponse::Field { name, ip })
                    .ok_or_else(|| DecodeError::new(body.clone(), "field is not an ip literal"));
            }
            Some(_) => return Err(DecodeError::new(body.clone(), "field is not a string")),
        }
    }

    match map.get(RAW_FIELD) {
        None | Some(Value::Null) => Ok(IpInfoResponse::Empty),
        Some(Value::String(text)) if text.trim().is_empty() => {
            Err(DecodeError::new(body.clone(), "empty body"))
        }
        Some(Value::String(text)) => parse_raw(text)
            .map(IpInfoResponse::Raw)
            .ok_or_else(|| DecodeError::new(body.clone(), "text is not an ip literal")),
        Some(_) => Err(DecodeError::new(body.clone(), "raw is not a string")),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(body: Value) -> String {
        parse(&body).unwrap().as_str().to_string()
    }

    // ===== Known provider shapes =====

    #[test]
    fn test_parse_each_known_field() {
        let fixtures = vec![
            json!({"YourFuckingIPAddress": "1.2.3.4", "YourFuckingLocation": "Nowhere"}),
            json!({"origin": "1.2.3.4"}),
            json!({"IsTor": false, "IP": "1.2.3.4"}),
            json!({"ip": "1.2.3.4", "country": "US"}),
            json!({"remote_addr": "1.2.3.4"}),
        ];

        for body in fixtures {
            assert_eq!(parsed(body.clone()), "1.2.3.4", "fixture {}", body);
        }
    }

    #[test]
    fn test_parse_reports_matching_field() {
        let decoded = decode(&json!({"origin": "5.6.7.8"})).unwrap();
        assert_eq!(
            decoded,
            IpInfoResponse::Field {
                name: "origin",
                ip: ExtractedIp::parse("5.6.7.8").unwrap()
            }
        );
    }

    #[test]
    fn test_field_priority_is_fixed() {
        // Key order in the object must not matter
        let body = json!({"remote_addr": "9.9.9.9", "ip": "8.8.8.8", "origin": "1.1.1.1"});
        assert_eq!(parsed(body), "1.1.1.1");
    }

    #[test]
    fn test_empty_field_falls_through_to_next() {
        let body = json!({"origin": "", "IP": null, "ip": "4.3.2.1"});
        assert_eq!(parsed(body), "4.3.2.1");
    }

    #[test]
    fn test_known_field_wins_over_raw() {
        let body = json!({"ip": "1.2.3.4", "raw": "5.6.7.8"});
        assert_eq!(parsed(body), "1.2.3.4");
    }

    #[test]
    fn test_parse_ipv6_field() {
        assert_eq!(parsed(json!({"ip": "2001:db8::42"})), "2001:db8::42");
    }

    // ===== Text bodies =====

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(parsed(wrap_text("1.2.3.4\n")), "1.2.3.4");
    }

    #[test]
    fn test_parse_text_with_host_suffix() {
        assert_eq!(parsed(wrap_text("1.2.3.4 - host")), "1.2.3.4");
    }

    #[test]
    fn test_parse_raw_with_whitespace_and_suffix() {
        let body = json!({"raw": "  1.2.3.4 - somehost  "});
        assert_eq!(parsed(body), "1.2.3.4");
    }

    #[test]
    fn test_parse_bare_json_string() {
        assert_eq!(parsed(json!("1.2.3.4")), "1.2.3.4");
        assert_eq!(parsed(json!("1.2.3.4 - host")), "1.2.3.4");
    }

    #[test]
    fn test_parse_raw_helper() {
        assert_eq!(parse_raw(" 10.1.2.3 ").unwrap().as_str(), "10.1.2.3");
        assert_eq!(parse_raw("::1 - localhost").unwrap().as_str(), "::1");
        assert!(parse_raw("").is_none());
        assert!(parse_raw("host - 1.2.3.4").is_none());
        assert!(parse_raw("1.2.3.4-host").is_none());
    }

    #[test]
    fn test_wrap_text_trims() {
        assert_eq!(wrap_text("  1.2.3.4\r\n"), json!({"raw": "1.2.3.4"}));
    }

    // ===== Malformed bodies =====

    #[test]
    fn test_missing_field_is_decode_error() {
        let body = json!({"status": "ok"});
        let err = parse(&body).unwrap_err();
        assert_eq!(err.raw, body);
    }

    #[test]
    fn test_missing_field_decodes_as_empty() {
        assert_eq!(decode(&json!({})).unwrap(), IpInfoResponse::Empty);
        assert_eq!(decode(&json!({"ip": ""})).unwrap(), IpInfoResponse::Empty);
    }

    #[test]
    fn test_invalid_ip_syntax_is_decode_error() {
        for body in [
            json!({"ip": "not-an-ip"}),
            json!({"origin": "1.2.3.4, 5.6.7.8"}),
            json!({"IP": "300.1.1.1"}),
            wrap_text("<html>blocked</html>"),
            wrap_text("host - 1.2.3.4"),
        ] {
            let err = parse(&body).unwrap_err();
            assert_eq!(err.raw, body);
        }
    }

    #[test]
    fn test_invalid_higher_priority_field_is_not_skipped() {
        let body = json!({"origin": "garbage", "ip": "1.2.3.4"});
        assert!(parse(&body).is_err());
    }

    #[test]
    fn test_empty_body_is_decode_error() {
        let err = parse(&wrap_text("")).unwrap_err();
        assert_eq!(err.reason, "empty body");
        assert!(parse(&wrap_text("   \n")).is_err());
    }

    #[test]
    fn test_non_string_values_are_decode_errors() {
        assert!(parse(&json!({"ip": 1234})).is_err());
        assert!(parse(&json!({"raw": ["1.2.3.4"]})).is_err());
        assert!(parse(&json!([{"ip": "1.2.3.4"}])).is_err());
        assert!(parse(&json!(42)).is_err());
        assert!(parse(&Value::Null).is_err());
    }
}
