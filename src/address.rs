//! Dotted-decimal IPv4 conversion
//!
//! Two parsers live here:
//!
//! - [`addr_to_num`] is the legacy permissive parser. Anything it cannot make
//!   sense of collapses to `0`, so `"0.0.0.0"` and `"foo.bar"` are
//!   indistinguishable. It is kept for compatibility with code that stores
//!   address numbers in CSV or SQL tables.
//! - [`parse_addr`] is strict and returns `None` on malformed input. Database
//!   lookups go through this one, so a typo never silently becomes a lookup
//!   of `0.0.0.0`.
//!
//! ```rust
//! use geoip_dat::address::{addr_to_num, num_to_addr, parse_addr};
//!
//! assert_eq!(addr_to_num("24.24.24.24"), 404232216);
//! assert_eq!(num_to_addr(404232216), "24.24.24.24");
//! assert_eq!(addr_to_num("foo.bar"), 0);
//! assert_eq!(parse_addr("foo.bar"), None);
//! ```

use crate::error::{GeoIpError, Result};
use serde_json::Value;
use std::fmt;
use std::net::Ipv4Addr;

/// Convert a dotted-decimal string to its big-endian integer form.
///
/// Permissive: returns `0` unless the input is exactly four dot-separated
/// groups of decimal digits, each at most 255. Empty groups count as `0`
/// (`"1..2.3"` parses), as older tools expect.
pub fn addr_to_num(addr: &str) -> u32 {
    legacy_parse(addr).unwrap_or(0)
}

fn legacy_parse(addr: &str) -> Option<u32> {
    let mut ipnum: u32 = 0;
    let mut octet: u32 = 0;
    let mut dots = 0;

    for b in addr.bytes() {
        if b == b'.' {
            dots += 1;
            if dots > 3 {
                return None;
            }
            ipnum = (ipnum << 8) | octet;
            octet = 0;
        } else {
            let digit = b.wrapping_sub(b'0');
            if digit > 9 {
                return None;
            }
            octet = octet * 10 + digit as u32;
            if octet > 255 {
                return None;
            }
        }
    }

    if dots != 3 {
        return None;
    }
    Some((ipnum << 8) | octet)
}

/// Strictly parse a dotted-decimal IPv4 address.
///
/// Rejects anything `std::net::Ipv4Addr` rejects, including empty octets
/// and leading zeros, so `num_to_addr(parse_addr(s)?) == s` always holds.
pub fn parse_addr(addr: &str) -> Option<u32> {
    addr.parse::<Ipv4Addr>().ok().map(u32::from)
}

/// Format a 32-bit address number as dotted decimal, most significant
/// octet first.
pub fn num_to_addr(ipnum: u32) -> String {
    Ipv4Addr::from(ipnum).to_string()
}

/// [`addr_to_num`] over a dynamically typed argument.
///
/// Fails with `TypeMismatch` unless the value is a string.
pub fn addr_to_num_value(value: &Value) -> Result<u32> {
    match value {
        Value::String(s) => Ok(addr_to_num(s)),
        other => Err(type_mismatch("string", other)),
    }
}

/// [`num_to_addr`] over a dynamically typed argument.
///
/// Fails with `TypeMismatch` unless the value is an integer, and with
/// `MalformedAddress` if the integer does not fit in 32 unsigned bits.
pub fn num_to_addr_value(value: &Value) -> Result<String> {
    Ok(num_to_addr(ipnum_from_value(value)?))
}

pub(crate) fn ipnum_from_value(value: &Value) -> Result<u32> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).map_err(|_| GeoIpError::MalformedAddress(n.to_string()))
            } else if n.is_i64() {
                Err(GeoIpError::MalformedAddress(n.to_string()))
            } else {
                Err(type_mismatch("integer", value))
            }
        }
        other => Err(type_mismatch("integer", other)),
    }
}

pub(crate) fn type_mismatch(expected: &'static str, found: &Value) -> GeoIpError {
    GeoIpError::TypeMismatch {
        expected,
        found: value_kind(found),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Address range covered by a single tree leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Network {
    /// First address in the range
    pub first: u32,
    /// Last address in the range (inclusive)
    pub last: u32,
    /// Number of leading bits shared by every address in the range
    pub prefix_len: u8,
}

impl Network {
    /// Build the range of `prefix_len` leading bits around `ipnum`
    pub fn from_prefix(ipnum: u32, prefix_len: u8) -> Self {
        let prefix_len = prefix_len.min(32);
        let mask = if prefix_len == 0 {
            0
        } else {
            u32::MAX << (32 - prefix_len as u32)
        };
        Network {
            first: ipnum & mask,
            last: (ipnum & mask) | !mask,
            prefix_len,
        }
    }

    /// True when `ipnum` falls inside this range
    pub fn contains(&self, ipnum: u32) -> bool {
        ipnum >= self.first && ipnum <= self.last
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", num_to_addr(self.first), self.prefix_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_known_values() {
        assert_eq!(addr_to_num("24.24.24.24"), 16777216 * 24 + 65536 * 24 + 256 * 24 + 24);
        assert_eq!(addr_to_num("24.24.24.24"), 404232216);
        assert_eq!(addr_to_num("245.245.245.245"), 4126537205);
        assert_eq!(num_to_addr(404232216), "24.24.24.24");
        assert_eq!(num_to_addr(4126537205), "245.245.245.245");
        assert_eq!(addr_to_num("255.255.255.255"), u32::MAX);
        assert_eq!(num_to_addr(0), "0.0.0.0");
    }

    #[test]
    fn test_permissive_failures_collapse_to_zero() {
        for bad in [
            "",
            "foo.bar",
            "1.2.3",
            "1.2.3.4.5",
            "256.1.1.1",
            "1.2.3.4 ",
            "-1.2.3.4",
            "1.2.3.a",
            "1.2.3.1000",
        ] {
            assert_eq!(addr_to_num(bad), 0, "{:?} should collapse to 0", bad);
        }
    }

    #[test]
    fn test_permissive_quirks() {
        // Empty groups read as zero, leading zeros are plain decimal
        assert_eq!(addr_to_num("1..2.3"), 0x01000203);
        assert_eq!(addr_to_num("010.0.0.1"), 0x0A000001);
        assert_eq!(addr_to_num("..."), 0);
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!(parse_addr("24.24.24.24"), Some(404232216));
        assert_eq!(parse_addr("1..2.3"), None);
        assert_eq!(parse_addr("010.0.0.1"), None);
        assert_eq!(parse_addr("foo.bar"), None);
        assert_eq!(parse_addr(""), None);
    }

    #[test]
    fn test_dynamic_arguments() {
        assert_eq!(addr_to_num_value(&json!("24.24.24.24")).unwrap(), 404232216);
        assert!(matches!(
            addr_to_num_value(&Value::Null),
            Err(GeoIpError::TypeMismatch { found: "null", .. })
        ));
        assert!(matches!(
            addr_to_num_value(&json!(12)),
            Err(GeoIpError::TypeMismatch { .. })
        ));

        assert_eq!(num_to_addr_value(&json!(404232216)).unwrap(), "24.24.24.24");
        assert!(matches!(
            num_to_addr_value(&Value::Null),
            Err(GeoIpError::TypeMismatch { .. })
        ));
        assert!(matches!(
            num_to_addr_value(&json!("foo.bar")),
            Err(GeoIpError::TypeMismatch { found: "string", .. })
        ));
        assert!(matches!(
            num_to_addr_value(&json!(1.5)),
            Err(GeoIpError::TypeMismatch { found: "float", .. })
        ));
        assert!(matches!(
            num_to_addr_value(&json!(-1)),
            Err(GeoIpError::MalformedAddress(_))
        ));
        assert!(matches!(
            num_to_addr_value(&json!(1u64 << 32)),
            Err(GeoIpError::MalformedAddress(_))
        ));
    }

    #[test]
    fn test_network_from_prefix() {
        let net = Network::from_prefix(addr_to_num("24.24.24.24"), 16);
        assert_eq!(num_to_addr(net.first), "24.24.0.0");
        assert_eq!(num_to_addr(net.last), "24.24.255.255");
        assert!(net.contains(addr_to_num("24.24.1.2")));
        assert!(!net.contains(addr_to_num("24.25.0.0")));
        assert_eq!(net.to_string(), "24.24.0.0/16");

        let all = Network::from_prefix(12345, 0);
        assert_eq!((all.first, all.last), (0, u32::MAX));

        let host = Network::from_prefix(12345, 32);
        assert_eq!((host.first, host.last), (12345, 12345));
    }

    proptest! {
        #[test]
        fn prop_num_round_trip(n in any::<u32>()) {
            prop_assert_eq!(addr_to_num(&num_to_addr(n)), n);
            prop_assert_eq!(parse_addr(&num_to_addr(n)), Some(n));
        }

        #[test]
        fn prop_text_round_trip(a in 0u8.., b in 0u8.., c in 0u8.., d in 0u8..) {
            let text = format!("{}.{}.{}.{}", a, b, c, d);
            prop_assert_eq!(num_to_addr(addr_to_num(&text)), text);
        }

        #[test]
        fn prop_strict_implies_permissive(s in "\\PC{0,20}") {
            if let Some(n) = parse_addr(&s) {
                prop_assert_eq!(addr_to_num(&s), n);
            }
        }
    }
}
